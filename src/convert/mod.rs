//! Pixel-format conversion.
//!
//! Conversions are planned as short chains of table-driven steps and then
//! executed over whole buffers. A [`Converter`] remembers the most recent
//! plan, so repeated conversions between the same pair of formats (the
//! common case when walking blocks of a texture) skip the path search.

mod catalog;
mod execute;
mod plan;

use alloc::vec::Vec;

pub use plan::Plan;

use crate::error::TextureError;
use crate::pixel::PixelFormat;

/// Plans and runs pixel-format conversions, caching the last plan used.
///
/// The cache holds exactly one plan. Converting between a new pair of
/// formats replaces it; converting between the cached pair reuses it.
#[derive(Default)]
pub struct Converter {
    cached: Option<Plan>,
}

impl Converter {
    pub fn new() -> Converter {
        Converter { cached: None }
    }

    /// The (source, target) pair of the cached plan, if any.
    pub fn cached_pair(&self) -> Option<(PixelFormat, PixelFormat)> {
        self.cached.as_ref().map(|p| (p.source(), p.target()))
    }

    pub fn reset_cache(&mut self) {
        self.cached = None;
    }

    /// Whether pixels can be converted from `source` to `target` at all.
    pub fn supported(source: PixelFormat, target: PixelFormat) -> bool {
        source == target || plan::find_plan(source, target).is_some()
    }

    /// Look up or build the plan for a format pair.
    pub fn plan(
        &mut self,
        source: PixelFormat,
        target: PixelFormat,
    ) -> Result<&Plan, TextureError> {
        let hit = self
            .cached
            .as_ref()
            .is_some_and(|p| p.source() == source && p.target() == target);
        if !hit {
            let plan = if source == target {
                Plan::identity(source)
            } else {
                plan::find_plan(source, target)
                    .ok_or(TextureError::UnsupportedConversion { from: source, to: target })?
            };
            self.cached = Some(plan);
        }
        self.cached
            .as_ref()
            .ok_or(TextureError::UnsupportedConversion { from: source, to: target })
    }

    /// Convert `n` pixels from `source` into `target`.
    ///
    /// The source buffer may be rewritten during execution; only `target`
    /// holds defined contents afterwards.
    pub fn convert(
        &mut self,
        source: &mut [u8],
        source_format: PixelFormat,
        target: &mut [u8],
        target_format: PixelFormat,
        n: usize,
    ) -> Result<(), TextureError> {
        check_len(source.len(), n * source_format.pixel_size())?;
        check_len(target.len(), n * target_format.pixel_size())?;
        let plan = self.plan(source_format, target_format)?;
        execute::run_plan(plan, source, n, target)
    }

    /// Convert `n` pixels within `buf`, which requires every step of the
    /// plan to preserve pixel size.
    pub fn convert_in_place(
        &mut self,
        buf: &mut [u8],
        source_format: PixelFormat,
        target_format: PixelFormat,
        n: usize,
    ) -> Result<(), TextureError> {
        check_len(buf.len(), n * source_format.pixel_size())?;
        let plan = self.plan(source_format, target_format)?;
        if !plan.is_in_place() {
            return Err(TextureError::ConversionNotInPlace {
                from: source_format,
                to: target_format,
            });
        }
        execute::run_plan_in_place(plan, buf, n)
    }
}

fn check_len(actual: usize, needed: usize) -> Result<(), TextureError> {
    if actual < needed {
        return Err(TextureError::BufferTooSmall { needed, actual });
    }
    Ok(())
}

/// One-shot conversion of `n` pixels. Allocates a fresh plan; use a
/// [`Converter`] when converting repeatedly between the same formats.
pub fn convert_pixels(
    source: &[u8],
    source_format: PixelFormat,
    target: &mut [u8],
    target_format: PixelFormat,
    n: usize,
) -> Result<(), TextureError> {
    let len = n * source_format.pixel_size();
    check_len(source.len(), len)?;
    let mut scratch: Vec<u8> = Vec::new();
    scratch.extend_from_slice(&source[..len]);
    Converter::new().convert(&mut scratch, source_format, target, target_format, n)
}

/// One-shot in-place conversion of `n` pixels.
pub fn convert_pixels_in_place(
    buf: &mut [u8],
    source_format: PixelFormat,
    target_format: PixelFormat,
    n: usize,
) -> Result<(), TextureError> {
    Converter::new().convert_in_place(buf, source_format, target_format, n)
}

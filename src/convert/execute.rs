//! Plan execution over pixel buffers.
//!
//! The executor walks a plan's steps while tracking a single "current"
//! buffer: the caller's source, a temporary, or the caller's target. Each
//! in-place step rewrites the current buffer; each reallocating step moves
//! the current buffer somewhere new. Temporaries live in a bounded pool and
//! drop when execution returns, on every path.

use alloc::vec::Vec;

use super::catalog::Routine;
use super::plan::Plan;
use crate::error::TextureError;

/// Most temporary buffers one execution may allocate.
pub(crate) const MAX_TEMP_BUFFERS: usize = 3;

/// Bounded pool of temporaries. Buffers stay alive until the pool drops so
/// the current-buffer index is never invalidated mid-plan.
struct TempPool {
    bufs: Vec<Vec<u8>>,
}

impl TempPool {
    fn new() -> TempPool {
        TempPool {
            bufs: Vec::with_capacity(MAX_TEMP_BUFFERS),
        }
    }

    fn alloc(&mut self, len: usize) -> Result<Vec<u8>, TextureError> {
        if self.bufs.len() >= MAX_TEMP_BUFFERS {
            return Err(TextureError::TooManyTemporaryBuffers);
        }
        Ok(alloc::vec![0u8; len])
    }

    fn keep(&mut self, buf: Vec<u8>) -> usize {
        self.bufs.push(buf);
        self.bufs.len() - 1
    }
}

/// Which buffer currently holds the partially converted pixels.
#[derive(Clone, Copy)]
enum Current {
    Source,
    Temp(usize),
    Target,
}

/// Run `plan` over `n` pixels from `source` into `target`.
///
/// In-place prefix steps mutate `source` unless a defensive copy was taken;
/// `target` is written only by the final reallocating step or the final
/// verbatim copy.
pub(crate) fn run_plan(
    plan: &Plan,
    source: &mut [u8],
    n: usize,
    target: &mut [u8],
) -> Result<(), TextureError> {
    let steps = plan.raw_steps();
    if steps.is_empty() {
        // Identity: verbatim copy.
        let len = n * plan.source().pixel_size();
        target[..len].copy_from_slice(&source[..len]);
        return Ok(());
    }

    let mut pool = TempPool::new();
    let last_realloc = steps.iter().rposition(|s| !s.is_in_place());

    let mut current = Current::Source;
    if last_realloc.is_some() && steps[0].is_in_place() {
        // A later step reallocates, so the overall result never comes from
        // the source buffer. Since the chain starts in place, work on a copy
        // to keep the caller's source memory pristine.
        let len = n * plan.source().pixel_size();
        let mut copy = pool.alloc(len)?;
        copy.copy_from_slice(&source[..len]);
        current = Current::Temp(pool.keep(copy));
    }

    for (i, step) in steps.iter().enumerate() {
        match step.routine {
            Routine::InPlace(f) => {
                let len = n * step.source.pixel_size();
                let buf = match current {
                    Current::Source => &mut source[..len],
                    Current::Temp(t) => &mut pool.bufs[t][..len],
                    Current::Target => &mut target[..len],
                };
                f(buf, n);
            }
            Routine::Copy(f) => {
                let src_len = n * step.source.pixel_size();
                let dst_len = n * step.target.pixel_size();
                if Some(i) == last_realloc {
                    // Final size change lands directly in the caller's target.
                    let src: &[u8] = match current {
                        Current::Source => &source[..src_len],
                        Current::Temp(t) => &pool.bufs[t][..src_len],
                        Current::Target => unreachable!("target reached before last realloc"),
                    };
                    f(src, &mut target[..dst_len], n);
                    current = Current::Target;
                } else {
                    let mut temp = pool.alloc(dst_len)?;
                    let src: &[u8] = match current {
                        Current::Source => &source[..src_len],
                        Current::Temp(t) => &pool.bufs[t][..src_len],
                        Current::Target => &target[..src_len],
                    };
                    f(src, &mut temp, n);
                    current = Current::Temp(pool.keep(temp));
                }
            }
        }
    }

    if !matches!(current, Current::Target) {
        // Pure in-place plan: the steps ran on the source buffer; the target
        // still needs the bytes.
        let len = n * plan.target().pixel_size();
        let src: &[u8] = match current {
            Current::Source => &source[..len],
            Current::Temp(t) => &pool.bufs[t][..len],
            Current::Target => unreachable!(),
        };
        target[..len].copy_from_slice(src);
    }

    Ok(())
}

/// Run a fully in-place plan directly on `buf`.
pub(crate) fn run_plan_in_place(
    plan: &Plan,
    buf: &mut [u8],
    n: usize,
) -> Result<(), TextureError> {
    debug_assert!(plan.is_in_place());
    for step in plan.raw_steps() {
        match step.routine {
            Routine::InPlace(f) => {
                let len = n * step.source.pixel_size();
                f(&mut buf[..len], n);
            }
            Routine::Copy(_) => {
                return Err(TextureError::ConversionNotInPlace {
                    from: plan.source(),
                    to: plan.target(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::plan::{Plan, find_plan};
    use crate::pixel::PixelFormat;

    fn catalog_step(
        source: PixelFormat,
        target: PixelFormat,
    ) -> &'static crate::convert::catalog::ConversionStep {
        crate::convert::catalog::CATALOG
            .iter()
            .find(|s| s.source == source && s.target == target)
            .expect("catalog step missing")
    }

    #[test]
    fn four_reallocating_steps_fit_the_pool() {
        // The shipping catalog never plans this chain (shorter routes win),
        // so assemble it by hand: four size changes need temporaries for the
        // first three while the last writes the caller's target.
        let steps = alloc::vec![
            catalog_step(PixelFormat::R8, PixelFormat::RG8),
            catalog_step(PixelFormat::RG8, PixelFormat::RGB8),
            catalog_step(PixelFormat::RGB8, PixelFormat::RGBA8),
            catalog_step(PixelFormat::RGBA8, PixelFormat::RGBA16),
        ];
        let plan = Plan::from_steps(PixelFormat::R8, PixelFormat::RGBA16, steps);
        let mut src = [17u8; 1];
        let mut dst = [0u8; 8];
        run_plan(&plan, &mut src, 1, &mut dst).unwrap();
        assert_eq!(u16::from_ne_bytes([dst[0], dst[1]]), 17 * 257);
        assert_eq!(u16::from_ne_bytes([dst[6], dst[7]]), 0xFFFF);
    }

    #[test]
    fn fourth_temporary_allocation_is_refused() {
        let mut pool = TempPool::new();
        for _ in 0..MAX_TEMP_BUFFERS {
            let buf = pool.alloc(16).unwrap();
            pool.keep(buf);
        }
        let err = pool.alloc(16).unwrap_err();
        assert!(matches!(err, TextureError::TooManyTemporaryBuffers));
    }

    #[test]
    fn three_reallocating_steps_fit_the_pool() {
        let steps = alloc::vec![
            catalog_step(PixelFormat::R16, PixelFormat::RG16),
            catalog_step(PixelFormat::RG16, PixelFormat::RGB16),
            catalog_step(PixelFormat::RGB16, PixelFormat::RGBA16),
        ];
        let plan = Plan::from_steps(PixelFormat::R16, PixelFormat::RGBA16, steps);
        let mut src = [0u8; 2];
        src.copy_from_slice(&0x1234u16.to_ne_bytes());
        let mut dst = [0u8; 8];
        run_plan(&plan, &mut src, 1, &mut dst).unwrap();
        assert_eq!(u16::from_ne_bytes([dst[0], dst[1]]), 0x1234);
        assert_eq!(u16::from_ne_bytes([dst[2], dst[3]]), 0);
        assert_eq!(u16::from_ne_bytes([dst[6], dst[7]]), 0xFFFF);
    }

    #[test]
    fn defensive_copy_preserves_source() {
        // SIGNED_RG16 -> RG16 (in place) -> RGB8 (realloc): the in-place
        // prefix must not leak into the caller's source buffer.
        let plan = find_plan(PixelFormat::SIGNED_RG16, PixelFormat::RGB8).unwrap();
        assert!(plan.raw_steps()[0].is_in_place());
        let mut src = [0u8; 4];
        src[..2].copy_from_slice(&0u16.to_ne_bytes());
        src[2..].copy_from_slice(&0u16.to_ne_bytes());
        let before = src;
        let mut dst = [0u8; 3];
        run_plan(&plan, &mut src, 1, &mut dst).unwrap();
        assert_eq!(src, before);
        // signed 0 remaps to unsigned 32768, which narrows to mid gray
        assert_eq!(dst[0], 127);
        assert_eq!(dst[1], 127);
        assert_eq!(dst[2], 0);
    }

    #[test]
    fn pure_in_place_plan_mutates_source_and_copies_to_target() {
        let plan = find_plan(PixelFormat::RGBA8, PixelFormat::BGRA8).unwrap();
        let mut src = [1u8, 2, 3, 4];
        let mut dst = [0u8; 4];
        run_plan(&plan, &mut src, 1, &mut dst).unwrap();
        assert_eq!(dst, [3, 2, 1, 4]);
        // documented side effect: the source buffer was converted in place
        assert_eq!(src, [3, 2, 1, 4]);
    }
}

//! Dynamic-range measurement and HDR-to-LDR remapping for float textures.

use half::f16;

use crate::error::TextureError;
use crate::pixel::PixelFormat;

fn range_of(values: impl Iterator<Item = f32>) -> (f32, f32) {
    let mut range_min = f32::MAX;
    let mut range_max = f32::MIN;
    for f in values {
        if f < range_min {
            range_min = f;
        }
        if f > range_max {
            range_max = f;
        }
    }
    (range_min, range_max)
}

/// The (min, max) over every component of `n_pixels` pixels in a half or
/// single float format.
pub fn dynamic_range(
    buffer: &[u8],
    n_pixels: usize,
    format: PixelFormat,
) -> Result<(f32, f32), TextureError> {
    if !format.is_float() {
        return Err(TextureError::UnsupportedVariant(alloc::format!(
            "dynamic range requires a float format, got {format:?}"
        )));
    }
    let bytes = n_pixels * format.pixel_size();
    if buffer.len() < bytes {
        return Err(TextureError::BufferTooSmall {
            needed: bytes,
            actual: buffer.len(),
        });
    }
    let range = match format.component_size() {
        2 => range_of(
            buffer[..bytes]
                .chunks_exact(2)
                .map(|c| f16::from_bits(u16::from_ne_bytes([c[0], c[1]])).to_f32()),
        ),
        _ => range_of(
            buffer[..bytes]
                .chunks_exact(4)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]])),
        ),
    };
    Ok(range)
}

fn remap_unit(f: f32, range_min: f32, range_max: f32) -> f32 {
    let span = range_max - range_min;
    if span <= 0.0 {
        return 0.0;
    }
    ((f - range_min) / span).clamp(0.0, 1.0)
}

/// Linearly remap half-float components from `[range_min, range_max]` to
/// normalized u16, in place. The buffer holds FLOAT_R16-family components
/// on entry and R16-family components on return.
pub fn convert_hdr_half_to_u16_gamma1(buffer: &mut [u8], range_min: f32, range_max: f32) {
    for c in buffer.chunks_exact_mut(2) {
        let f = f16::from_bits(u16::from_ne_bytes([c[0], c[1]])).to_f32();
        let v = (remap_unit(f, range_min, range_max) * 65535.0 + 0.5) as u16;
        c.copy_from_slice(&v.to_ne_bytes());
    }
}

/// Linearly remap single-float components from `[range_min, range_max]` to
/// `[0, 1]`, in place.
pub fn convert_hdr_float_gamma1(buffer: &mut [u8], range_min: f32, range_max: f32) {
    for c in buffer.chunks_exact_mut(4) {
        let f = f32::from_ne_bytes([c[0], c[1], c[2], c[3]]);
        let v = remap_unit(f, range_min, range_max);
        c.copy_from_slice(&v.to_ne_bytes());
    }
}

/// Gamma-corrected HDR remap. Not available without a float `powf`.
pub fn convert_hdr_half_to_u16_special_gamma(
    _buffer: &mut [u8],
    _gamma: f32,
    _range_min: f32,
    _range_max: f32,
) -> Result<(), TextureError> {
    Err(TextureError::Unimplemented("hdr special gamma"))
}

/// Gamma-corrected HDR remap. Not available without a float `powf`.
pub fn convert_hdr_float_special_gamma(
    _buffer: &mut [u8],
    _gamma: f32,
    _range_min: f32,
    _range_max: f32,
) -> Result<(), TextureError> {
    Err(TextureError::Unimplemented("hdr special gamma"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_over_float_buffer() {
        let mut buf = [0u8; 16];
        for (i, v) in [0.5f32, -2.0, 7.25, 1.0].iter().enumerate() {
            buf[i * 4..i * 4 + 4].copy_from_slice(&v.to_ne_bytes());
        }
        let (lo, hi) = dynamic_range(&buf, 4, PixelFormat::FLOAT_R32).unwrap();
        assert_eq!(lo, -2.0);
        assert_eq!(hi, 7.25);
    }

    #[test]
    fn range_over_half_buffer() {
        let mut buf = [0u8; 8];
        for (i, v) in [0.0f32, 4.0, -1.5, 2.0].iter().enumerate() {
            buf[i * 2..i * 2 + 2].copy_from_slice(&f16::from_f32(*v).to_bits().to_ne_bytes());
        }
        let (lo, hi) = dynamic_range(&buf, 4, PixelFormat::FLOAT_R16).unwrap();
        assert_eq!(lo, -1.5);
        assert_eq!(hi, 4.0);
    }

    #[test]
    fn non_float_format_is_rejected() {
        let buf = [0u8; 4];
        assert!(dynamic_range(&buf, 1, PixelFormat::RGBA8).is_err());
    }

    #[test]
    fn gamma1_half_remap_hits_endpoints() {
        let mut buf = [0u8; 6];
        for (i, v) in [1.0f32, 3.0, 2.0].iter().enumerate() {
            buf[i * 2..i * 2 + 2].copy_from_slice(&f16::from_f32(*v).to_bits().to_ne_bytes());
        }
        convert_hdr_half_to_u16_gamma1(&mut buf, 1.0, 3.0);
        assert_eq!(u16::from_ne_bytes([buf[0], buf[1]]), 0);
        assert_eq!(u16::from_ne_bytes([buf[2], buf[3]]), 65535);
        assert_eq!(u16::from_ne_bytes([buf[4], buf[5]]), 32768);
    }

    #[test]
    fn gamma1_float_remap_is_linear() {
        let mut buf = [0u8; 8];
        buf[0..4].copy_from_slice(&10.0f32.to_ne_bytes());
        buf[4..8].copy_from_slice(&20.0f32.to_ne_bytes());
        convert_hdr_float_gamma1(&mut buf, 10.0, 30.0);
        assert_eq!(f32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]), 0.0);
        assert_eq!(f32::from_ne_bytes([buf[4], buf[5], buf[6], buf[7]]), 0.5);
    }

    #[test]
    fn special_gamma_is_unimplemented() {
        let mut buf = [0u8; 4];
        assert!(convert_hdr_float_special_gamma(&mut buf, 2.2, 0.0, 1.0).is_err());
    }
}

//! The table of atomic pixel-format conversion steps.
//!
//! Each step converts exactly `n` pixels. In-place steps keep the pixel byte
//! size and mutate one buffer; copying steps change the pixel size and read
//! from a source buffer while writing a distinct target buffer. The planner
//! chains steps from this table; declaration order is search order.

use half::f16;

use crate::pixel::PixelFormat;

/// The transformation a [`ConversionStep`] applies to `n` pixels.
///
/// The variant doubles as the in-place / reallocating classification the
/// executor needs: `InPlace` steps preserve pixel size by construction.
#[derive(Debug)]
pub(crate) enum Routine {
    InPlace(fn(&mut [u8], usize)),
    Copy(fn(&[u8], &mut [u8], usize)),
}

/// One atomic conversion between two pixel formats.
#[derive(Debug)]
pub(crate) struct ConversionStep {
    pub source: PixelFormat,
    pub target: PixelFormat,
    pub routine: Routine,
}

impl ConversionStep {
    pub(crate) fn is_in_place(&self) -> bool {
        matches!(self.routine, Routine::InPlace(_))
    }
}

const fn in_place(
    source: PixelFormat,
    target: PixelFormat,
    f: fn(&mut [u8], usize),
) -> ConversionStep {
    ConversionStep {
        source,
        target,
        routine: Routine::InPlace(f),
    }
}

const fn copying(
    source: PixelFormat,
    target: PixelFormat,
    f: fn(&[u8], &mut [u8], usize),
) -> ConversionStep {
    ConversionStep {
        source,
        target,
        routine: Routine::Copy(f),
    }
}

/// All registered conversion steps, in planner search order.
pub(crate) static CATALOG: &[ConversionStep] = &[
    // Component-order swaps.
    in_place(PixelFormat::RGBA8, PixelFormat::BGRA8, swap_red_blue_32),
    in_place(PixelFormat::BGRA8, PixelFormat::RGBA8, swap_red_blue_32),
    in_place(PixelFormat::RGBX8, PixelFormat::BGRX8, swap_red_blue_32),
    in_place(PixelFormat::BGRX8, PixelFormat::RGBX8, swap_red_blue_32),
    in_place(PixelFormat::RGB8, PixelFormat::BGR8, swap_red_blue_24),
    in_place(PixelFormat::BGR8, PixelFormat::RGB8, swap_red_blue_24),
    in_place(PixelFormat::RGBA16, PixelFormat::BGRA16, swap_red_blue_64),
    in_place(PixelFormat::BGRA16, PixelFormat::RGBA16, swap_red_blue_64),
    // Alpha / padding-byte normalization. Converting X to A (or A to X)
    // writes full opacity into byte 3 so the result is well defined.
    in_place(PixelFormat::RGBA8, PixelFormat::RGBX8, set_byte3_opaque),
    in_place(PixelFormat::RGBX8, PixelFormat::RGBA8, set_byte3_opaque),
    in_place(PixelFormat::BGRA8, PixelFormat::BGRX8, set_byte3_opaque),
    in_place(PixelFormat::BGRX8, PixelFormat::BGRA8, set_byte3_opaque),
    // Signed/unsigned remapping: add or subtract half range, wrapping.
    in_place(PixelFormat::R8, PixelFormat::SIGNED_R8, flip_sign_8_x1),
    in_place(PixelFormat::SIGNED_R8, PixelFormat::R8, flip_sign_8_x1),
    in_place(PixelFormat::RG8, PixelFormat::SIGNED_RG8, flip_sign_8_x2),
    in_place(PixelFormat::SIGNED_RG8, PixelFormat::RG8, flip_sign_8_x2),
    in_place(PixelFormat::R16, PixelFormat::SIGNED_R16, flip_sign_16_x1),
    in_place(PixelFormat::SIGNED_R16, PixelFormat::R16, flip_sign_16_x1),
    in_place(PixelFormat::RG16, PixelFormat::SIGNED_RG16, flip_sign_16_x2),
    in_place(PixelFormat::SIGNED_RG16, PixelFormat::RG16, flip_sign_16_x2),
    // Normalized half-float <-> 16-bit integer, in place.
    in_place(PixelFormat::FLOAT_R16, PixelFormat::R16, half_to_u16_x1),
    in_place(PixelFormat::R16, PixelFormat::FLOAT_R16, u16_to_half_x1),
    in_place(PixelFormat::FLOAT_RG16, PixelFormat::RG16, half_to_u16_x2),
    in_place(PixelFormat::RG16, PixelFormat::FLOAT_RG16, u16_to_half_x2),
    in_place(PixelFormat::FLOAT_RGB16, PixelFormat::RGB16, half_to_u16_x3),
    in_place(PixelFormat::RGB16, PixelFormat::FLOAT_RGB16, u16_to_half_x3),
    in_place(PixelFormat::FLOAT_RGBA16, PixelFormat::RGBA16, half_to_u16_x4),
    in_place(PixelFormat::RGBA16, PixelFormat::FLOAT_RGBA16, u16_to_half_x4),
    // Component reduction and expansion, 8-bit.
    copying(PixelFormat::RGBX8, PixelFormat::RGB8, drop_byte3),
    copying(PixelFormat::RGB8, PixelFormat::RGBX8, add_opaque_byte3),
    copying(PixelFormat::RGBA8, PixelFormat::RGB8, drop_byte3),
    copying(PixelFormat::RGB8, PixelFormat::RGBA8, add_opaque_byte3),
    copying(PixelFormat::R8, PixelFormat::RG8, r8_to_rg8),
    copying(PixelFormat::RG8, PixelFormat::R8, rg8_to_r8),
    copying(PixelFormat::RG8, PixelFormat::RGB8, rg8_to_rgb8),
    copying(PixelFormat::R8, PixelFormat::RGBX8, r8_to_rgbx8),
    copying(PixelFormat::RG8, PixelFormat::RGBX8, rg8_to_rgbx8),
    // Component reduction and expansion, 16-bit.
    copying(PixelFormat::R16, PixelFormat::RG16, r16_to_rg16),
    copying(PixelFormat::RG16, PixelFormat::R16, rg16_to_r16),
    copying(PixelFormat::RG16, PixelFormat::RGB16, rg16_to_rgb16),
    copying(PixelFormat::RGB16, PixelFormat::RGBA16, rgb16_to_rgba16),
    copying(PixelFormat::RGBA16, PixelFormat::RGB16, rgba16_to_rgb16),
    // Bit-depth rescaling. 16-to-8 comes in a truncating variant (divide by
    // 257, the exact 65535/255 ratio) and a rounding variant that biases by
    // the 127 half step first; they are distinct steps bound to distinct
    // source formats and are not interchangeable.
    copying(PixelFormat::R16, PixelFormat::R8, narrow_trunc_x1),
    copying(PixelFormat::R8, PixelFormat::R16, widen_8_to_16_x1),
    copying(PixelFormat::RG16, PixelFormat::RG8, narrow_trunc_x2),
    copying(PixelFormat::RG8, PixelFormat::RG16, widen_8_to_16_x2),
    copying(PixelFormat::RGB16, PixelFormat::RGB8, narrow_round_x3),
    copying(PixelFormat::RGB8, PixelFormat::RGB16, widen_8_to_16_x3),
    copying(PixelFormat::RGBA16, PixelFormat::RGBA8, narrow_round_x4),
    copying(PixelFormat::RGBA8, PixelFormat::RGBA16, widen_8_to_16_x4),
    // Direct two-channel-16 to three-channel-8 entry. No composed chain
    // reproduces this without dropping below two components or exceeding
    // the four-step bound for its downstream users.
    copying(PixelFormat::RG16, PixelFormat::RGB8, rg16_to_rgb8),
    // Half-float <-> float widening and narrowing.
    copying(PixelFormat::FLOAT_R16, PixelFormat::FLOAT_R32, half_to_f32_x1),
    copying(PixelFormat::FLOAT_R32, PixelFormat::FLOAT_R16, f32_to_half_x1),
    copying(PixelFormat::FLOAT_RG16, PixelFormat::FLOAT_RG32, half_to_f32_x2),
    copying(PixelFormat::FLOAT_RG32, PixelFormat::FLOAT_RG16, f32_to_half_x2),
    copying(PixelFormat::FLOAT_RGB16, PixelFormat::FLOAT_RGB32, half_to_f32_x3),
    copying(PixelFormat::FLOAT_RGB32, PixelFormat::FLOAT_RGB16, f32_to_half_x3),
    copying(PixelFormat::FLOAT_RGBX16, PixelFormat::FLOAT_RGBX32, half_to_f32_x4),
    copying(PixelFormat::FLOAT_RGBX32, PixelFormat::FLOAT_RGBX16, f32_to_half_x4),
    copying(PixelFormat::FLOAT_RGBA16, PixelFormat::FLOAT_RGBA32, half_to_f32_x4),
    copying(PixelFormat::FLOAT_RGBA32, PixelFormat::FLOAT_RGBA16, f32_to_half_x4),
];

// ── In-place routines ───────────────────────────────────────────────

fn swap_red_blue_32(buf: &mut [u8], n: usize) {
    for px in buf[..n * 4].chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

fn swap_red_blue_24(buf: &mut [u8], n: usize) {
    for px in buf[..n * 3].chunks_exact_mut(3) {
        px.swap(0, 2);
    }
}

fn swap_red_blue_64(buf: &mut [u8], n: usize) {
    for px in buf[..n * 8].chunks_exact_mut(8) {
        px.swap(0, 4);
        px.swap(1, 5);
    }
}

fn set_byte3_opaque(buf: &mut [u8], n: usize) {
    for px in buf[..n * 4].chunks_exact_mut(4) {
        px[3] = 0xFF;
    }
}

fn flip_sign_8(buf: &mut [u8], samples: usize) {
    for b in &mut buf[..samples] {
        // wrapping +/-128; the same involution in both directions
        *b ^= 0x80;
    }
}

fn flip_sign_8_x1(buf: &mut [u8], n: usize) {
    flip_sign_8(buf, n);
}

fn flip_sign_8_x2(buf: &mut [u8], n: usize) {
    flip_sign_8(buf, n * 2);
}

fn map_u16(buf: &mut [u8], samples: usize, f: fn(u16) -> u16) {
    for chunk in buf[..samples * 2].chunks_exact_mut(2) {
        let v = u16::from_ne_bytes([chunk[0], chunk[1]]);
        chunk.copy_from_slice(&f(v).to_ne_bytes());
    }
}

fn flip_sign_16_x1(buf: &mut [u8], n: usize) {
    map_u16(buf, n, |v| v ^ 0x8000);
}

fn flip_sign_16_x2(buf: &mut [u8], n: usize) {
    map_u16(buf, n * 2, |v| v ^ 0x8000);
}

fn half_to_u16_norm(bits: u16) -> u16 {
    let f = f16::from_bits(bits).to_f32().clamp(0.0, 1.0);
    (f * 65535.0 + 0.5) as u16
}

fn u16_to_half_norm(v: u16) -> u16 {
    f16::from_f32(v as f32 / 65535.0).to_bits()
}

fn half_to_u16_x1(buf: &mut [u8], n: usize) {
    map_u16(buf, n, half_to_u16_norm);
}

fn half_to_u16_x2(buf: &mut [u8], n: usize) {
    map_u16(buf, n * 2, half_to_u16_norm);
}

fn half_to_u16_x3(buf: &mut [u8], n: usize) {
    map_u16(buf, n * 3, half_to_u16_norm);
}

fn half_to_u16_x4(buf: &mut [u8], n: usize) {
    map_u16(buf, n * 4, half_to_u16_norm);
}

fn u16_to_half_x1(buf: &mut [u8], n: usize) {
    map_u16(buf, n, u16_to_half_norm);
}

fn u16_to_half_x2(buf: &mut [u8], n: usize) {
    map_u16(buf, n * 2, u16_to_half_norm);
}

fn u16_to_half_x3(buf: &mut [u8], n: usize) {
    map_u16(buf, n * 3, u16_to_half_norm);
}

fn u16_to_half_x4(buf: &mut [u8], n: usize) {
    map_u16(buf, n * 4, u16_to_half_norm);
}

// ── Copying routines (pixel size changes) ───────────────────────────

fn drop_byte3(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n * 4]
        .chunks_exact(4)
        .zip(dst[..n * 3].chunks_exact_mut(3))
    {
        d.copy_from_slice(&s[..3]);
    }
}

fn add_opaque_byte3(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n * 3]
        .chunks_exact(3)
        .zip(dst[..n * 4].chunks_exact_mut(4))
    {
        d[..3].copy_from_slice(s);
        d[3] = 0xFF;
    }
}

fn r8_to_rg8(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n].iter().zip(dst[..n * 2].chunks_exact_mut(2)) {
        d[0] = *s;
        d[1] = 0;
    }
}

fn rg8_to_r8(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n * 2].chunks_exact(2).zip(&mut dst[..n]) {
        *d = s[0];
    }
}

fn rg8_to_rgb8(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n * 2]
        .chunks_exact(2)
        .zip(dst[..n * 3].chunks_exact_mut(3))
    {
        d[0] = s[0];
        d[1] = s[1];
        d[2] = 0;
    }
}

fn r8_to_rgbx8(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n].iter().zip(dst[..n * 4].chunks_exact_mut(4)) {
        d[0] = *s;
        d[1] = 0;
        d[2] = 0;
        d[3] = 0xFF;
    }
}

fn rg8_to_rgbx8(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n * 2]
        .chunks_exact(2)
        .zip(dst[..n * 4].chunks_exact_mut(4))
    {
        d[0] = s[0];
        d[1] = s[1];
        d[2] = 0;
        d[3] = 0xFF;
    }
}

fn read_u16(chunk: &[u8]) -> u16 {
    u16::from_ne_bytes([chunk[0], chunk[1]])
}

fn write_u16(chunk: &mut [u8], v: u16) {
    chunk.copy_from_slice(&v.to_ne_bytes());
}

fn r16_to_rg16(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n * 2]
        .chunks_exact(2)
        .zip(dst[..n * 4].chunks_exact_mut(4))
    {
        d[..2].copy_from_slice(s);
        write_u16(&mut d[2..4], 0);
    }
}

fn rg16_to_r16(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n * 4]
        .chunks_exact(4)
        .zip(dst[..n * 2].chunks_exact_mut(2))
    {
        d.copy_from_slice(&s[..2]);
    }
}

fn rg16_to_rgb16(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n * 4]
        .chunks_exact(4)
        .zip(dst[..n * 6].chunks_exact_mut(6))
    {
        d[..4].copy_from_slice(s);
        write_u16(&mut d[4..6], 0);
    }
}

fn rgb16_to_rgba16(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n * 6]
        .chunks_exact(6)
        .zip(dst[..n * 8].chunks_exact_mut(8))
    {
        d[..6].copy_from_slice(s);
        write_u16(&mut d[6..8], 0xFFFF);
    }
}

fn rgba16_to_rgb16(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n * 8]
        .chunks_exact(8)
        .zip(dst[..n * 6].chunks_exact_mut(6))
    {
        d.copy_from_slice(&s[..6]);
    }
}

/// Truncating 16-to-8 narrowing: v * 255 / 65535, exactly v / 257.
fn narrow_trunc(v: u16) -> u8 {
    (v / 257) as u8
}

/// Rounding 16-to-8 narrowing: half-step bias of 127 before dividing.
fn narrow_round(v: u16) -> u8 {
    ((v as u32 + 127) / 257) as u8
}

/// Exact 8-to-16 widening: v * 65535 / 255.
fn widen_8_to_16(v: u8) -> u16 {
    v as u16 * 257
}

fn narrow_16_to_8(src: &[u8], dst: &mut [u8], samples: usize, f: fn(u16) -> u8) {
    for (s, d) in src[..samples * 2].chunks_exact(2).zip(&mut dst[..samples]) {
        *d = f(read_u16(s));
    }
}

fn narrow_trunc_x1(src: &[u8], dst: &mut [u8], n: usize) {
    narrow_16_to_8(src, dst, n, narrow_trunc);
}

fn narrow_trunc_x2(src: &[u8], dst: &mut [u8], n: usize) {
    narrow_16_to_8(src, dst, n * 2, narrow_trunc);
}

fn narrow_round_x3(src: &[u8], dst: &mut [u8], n: usize) {
    narrow_16_to_8(src, dst, n * 3, narrow_round);
}

fn narrow_round_x4(src: &[u8], dst: &mut [u8], n: usize) {
    narrow_16_to_8(src, dst, n * 4, narrow_round);
}

fn widen_8_to_16_samples(src: &[u8], dst: &mut [u8], samples: usize) {
    for (s, d) in src[..samples]
        .iter()
        .zip(dst[..samples * 2].chunks_exact_mut(2))
    {
        write_u16(d, widen_8_to_16(*s));
    }
}

fn widen_8_to_16_x1(src: &[u8], dst: &mut [u8], n: usize) {
    widen_8_to_16_samples(src, dst, n);
}

fn widen_8_to_16_x2(src: &[u8], dst: &mut [u8], n: usize) {
    widen_8_to_16_samples(src, dst, n * 2);
}

fn widen_8_to_16_x3(src: &[u8], dst: &mut [u8], n: usize) {
    widen_8_to_16_samples(src, dst, n * 3);
}

fn widen_8_to_16_x4(src: &[u8], dst: &mut [u8], n: usize) {
    widen_8_to_16_samples(src, dst, n * 4);
}

fn rg16_to_rgb8(src: &[u8], dst: &mut [u8], n: usize) {
    for (s, d) in src[..n * 4]
        .chunks_exact(4)
        .zip(dst[..n * 3].chunks_exact_mut(3))
    {
        d[0] = narrow_round(read_u16(&s[0..2]));
        d[1] = narrow_round(read_u16(&s[2..4]));
        d[2] = 0;
    }
}

fn half_to_f32_samples(src: &[u8], dst: &mut [u8], samples: usize) {
    for (s, d) in src[..samples * 2]
        .chunks_exact(2)
        .zip(dst[..samples * 4].chunks_exact_mut(4))
    {
        let f = f16::from_bits(read_u16(s)).to_f32();
        d.copy_from_slice(&f.to_ne_bytes());
    }
}

fn f32_to_half_samples(src: &[u8], dst: &mut [u8], samples: usize) {
    for (s, d) in src[..samples * 4]
        .chunks_exact(4)
        .zip(dst[..samples * 2].chunks_exact_mut(2))
    {
        let f = f32::from_ne_bytes([s[0], s[1], s[2], s[3]]);
        write_u16(d, f16::from_f32(f).to_bits());
    }
}

fn half_to_f32_x1(src: &[u8], dst: &mut [u8], n: usize) {
    half_to_f32_samples(src, dst, n);
}

fn half_to_f32_x2(src: &[u8], dst: &mut [u8], n: usize) {
    half_to_f32_samples(src, dst, n * 2);
}

fn half_to_f32_x3(src: &[u8], dst: &mut [u8], n: usize) {
    half_to_f32_samples(src, dst, n * 3);
}

fn half_to_f32_x4(src: &[u8], dst: &mut [u8], n: usize) {
    half_to_f32_samples(src, dst, n * 4);
}

fn f32_to_half_x1(src: &[u8], dst: &mut [u8], n: usize) {
    f32_to_half_samples(src, dst, n);
}

fn f32_to_half_x2(src: &[u8], dst: &mut [u8], n: usize) {
    f32_to_half_samples(src, dst, n * 2);
}

fn f32_to_half_x3(src: &[u8], dst: &mut [u8], n: usize) {
    f32_to_half_samples(src, dst, n * 3);
}

fn f32_to_half_x4(src: &[u8], dst: &mut [u8], n: usize) {
    f32_to_half_samples(src, dst, n * 4);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_sizes_match_routine_kind() {
        for step in CATALOG {
            let same_size = step.source.pixel_size() == step.target.pixel_size();
            assert_eq!(
                step.is_in_place(),
                same_size,
                "{:?} -> {:?}",
                step.source,
                step.target
            );
        }
    }

    #[test]
    fn narrowing_constants() {
        assert_eq!(narrow_trunc(0), 0);
        assert_eq!(narrow_trunc(0xFFFF), 255);
        assert_eq!(narrow_trunc(257), 1);
        assert_eq!(narrow_round(0xFFFF), 255);
        assert_eq!(narrow_round(130), 1);
        assert_eq!(widen_8_to_16(255), 0xFFFF);
        assert_eq!(widen_8_to_16(0), 0);
        // round trip on exactly representable values
        for v in 0..=255u8 {
            assert_eq!(narrow_trunc(widen_8_to_16(v)), v);
            assert_eq!(narrow_round(widen_8_to_16(v)), v);
        }
    }

    #[test]
    fn half_u16_norm_endpoints() {
        assert_eq!(half_to_u16_norm(f16::ONE.to_bits()), 0xFFFF);
        assert_eq!(half_to_u16_norm(f16::ZERO.to_bits()), 0);
        // out-of-range values clamp instead of wrapping
        assert_eq!(half_to_u16_norm(f16::from_f32(2.0).to_bits()), 0xFFFF);
        assert_eq!(half_to_u16_norm(f16::from_f32(-1.0).to_bits()), 0);
        assert_eq!(u16_to_half_norm(0xFFFF), f16::ONE.to_bits());
    }

    #[test]
    fn swap_64_swaps_16bit_red_blue() {
        // one RGBA16 pixel: R=1, G=2, B=3, A=4
        let mut buf = [0u8; 8];
        for (i, v) in [1u16, 2, 3, 4].iter().enumerate() {
            buf[i * 2..i * 2 + 2].copy_from_slice(&v.to_ne_bytes());
        }
        swap_red_blue_64(&mut buf, 1);
        assert_eq!(read_u16(&buf[0..2]), 3);
        assert_eq!(read_u16(&buf[2..4]), 2);
        assert_eq!(read_u16(&buf[4..6]), 1);
        assert_eq!(read_u16(&buf[6..8]), 4);
    }

    #[test]
    fn routines_touch_exactly_n_pixels() {
        let mut buf = [1u8, 2, 3, 4, 0xAA, 0xBB, 0xCC, 0xDD];
        swap_red_blue_32(&mut buf, 1);
        assert_eq!(buf, [3, 2, 1, 4, 0xAA, 0xBB, 0xCC, 0xDD]);

        let src = [7u8, 8, 9, 10, 11, 12];
        let mut dst = [0u8; 10];
        add_opaque_byte3(&src, &mut dst, 2);
        assert_eq!(dst, [7, 8, 9, 0xFF, 10, 11, 12, 0xFF, 0, 0]);
    }
}

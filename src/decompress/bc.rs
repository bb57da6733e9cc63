//! S3TC block decoders (BC1, BC1 with 1-bit alpha, BC2, BC3).

use super::{DecodeFlags, ModeMask, div3_round, div5_round, div7_round};
use crate::error::TextureError;

fn read_u16_le(b: &[u8]) -> u32 {
    u32::from(b[0]) | (u32::from(b[1]) << 8)
}

/// Expand a 5:6:5 color to 8-bit components by bit replication.
fn expand_565(c: u32) -> [u32; 3] {
    let r = (c >> 11) & 0x1F;
    let g = (c >> 5) & 0x3F;
    let b = c & 0x1F;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

fn write_rgba(out: &mut [u8], i: usize, rgb: [u32; 3], a: u8) {
    let p = &mut out[i * 4..i * 4 + 4];
    p[0] = rgb[0] as u8;
    p[1] = rgb[1] as u8;
    p[2] = rgb[2] as u8;
    p[3] = a;
}

fn blend_thirds(c0: [u32; 3], c1: [u32; 3]) -> [u32; 3] {
    [
        div3_round(2 * c0[0] + c1[0]),
        div3_round(2 * c0[1] + c1[1]),
        div3_round(2 * c0[2] + c1[2]),
    ]
}

fn blend_half(c0: [u32; 3], c1: [u32; 3]) -> [u32; 3] {
    [(c0[0] + c1[0]) / 2, (c0[1] + c1[1]) / 2, (c0[2] + c1[2]) / 2]
}

/// Decode the 8-byte BC1 color section into `out` as RGBA8.
///
/// `always_four` forces four-color mode regardless of endpoint order (the
/// BC2/BC3 color section behaves that way); `one_bit_alpha` makes the
/// fourth palette entry of three-color mode transparent black.
fn decode_bc1_colors(bitstring: &[u8], always_four: bool, one_bit_alpha: bool, out: &mut [u8]) {
    let color0 = read_u16_le(&bitstring[0..2]);
    let color1 = read_u16_le(&bitstring[2..4]);
    let c0 = expand_565(color0);
    let c1 = expand_565(color1);
    let four_color = always_four || color0 > color1;
    let (c2, c3, a3) = if four_color {
        (blend_thirds(c0, c1), blend_thirds(c1, c0), 0xFF)
    } else if one_bit_alpha {
        (blend_half(c0, c1), [0, 0, 0], 0x00)
    } else {
        (blend_half(c0, c1), [0, 0, 0], 0xFF)
    };
    let palette = [c0, c1, c2, c3];
    let indices = u32::from_le_bytes([bitstring[4], bitstring[5], bitstring[6], bitstring[7]]);
    for i in 0..16 {
        let index = ((indices >> (i * 2)) & 3) as usize;
        let alpha = if index == 3 { a3 } else { 0xFF };
        write_rgba(out, i, palette[index], alpha);
    }
}

pub(super) fn decode_bc1(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    decode_bc1_colors(bitstring, false, false, out);
    Ok(())
}

pub(super) fn decode_bc1a(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    let four_color = read_u16_le(&bitstring[0..2]) > read_u16_le(&bitstring[2..4]);
    if four_color {
        if flags.contains(DecodeFlags::NON_OPAQUE_ONLY) {
            return Err(TextureError::InvalidBlock("opaque block filtered out"));
        }
    } else if flags.contains(DecodeFlags::OPAQUE_ONLY) {
        return Err(TextureError::InvalidBlock("transparent block filtered out"));
    }
    decode_bc1_colors(bitstring, false, true, out);
    Ok(())
}

pub(super) fn decode_bc2(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    // 64 bits of explicit 4-bit alpha, then an always-four-color BC1 section.
    let alpha_bits = u64::from_le_bytes([
        bitstring[0],
        bitstring[1],
        bitstring[2],
        bitstring[3],
        bitstring[4],
        bitstring[5],
        bitstring[6],
        bitstring[7],
    ]);
    if flags.0 != 0 {
        let all_opaque = (0..16).all(|i| (alpha_bits >> (i * 4)) & 0xF == 0xF);
        if all_opaque && flags.contains(DecodeFlags::NON_OPAQUE_ONLY) {
            return Err(TextureError::InvalidBlock("opaque block filtered out"));
        }
        if !all_opaque && flags.contains(DecodeFlags::OPAQUE_ONLY) {
            return Err(TextureError::InvalidBlock("transparent block filtered out"));
        }
    }
    decode_bc1_colors(&bitstring[8..16], true, false, out);
    for i in 0..16 {
        let nibble = ((alpha_bits >> (i * 4)) & 0xF) as u8;
        out[i * 4 + 3] = nibble | (nibble << 4);
    }
    Ok(())
}

/// The eight-entry interpolated alpha palette shared by BC3 and RGTC.
pub(super) fn alpha_palette(a0: u32, a1: u32) -> [u8; 8] {
    let mut p = [0u8; 8];
    p[0] = a0 as u8;
    p[1] = a1 as u8;
    if a0 > a1 {
        for i in 2..8 {
            p[i] = div7_round((8 - i as u32) * a0 + (i as u32 - 1) * a1) as u8;
        }
    } else {
        for i in 2..6 {
            p[i] = div5_round((6 - i as u32) * a0 + (i as u32 - 1) * a1) as u8;
        }
        p[6] = 0;
        p[7] = 255;
    }
    p
}

/// The 48-bit index section of a BC3/RGTC block: 16 3-bit indices,
/// least significant bits first.
pub(super) fn three_bit_indices(bytes: &[u8]) -> [u8; 16] {
    let mut bits: u64 = 0;
    for (i, b) in bytes[..6].iter().enumerate() {
        bits |= u64::from(*b) << (i * 8);
    }
    let mut indices = [0u8; 16];
    for (i, idx) in indices.iter_mut().enumerate() {
        *idx = ((bits >> (i * 3)) & 7) as u8;
    }
    indices
}

pub(super) fn decode_bc3(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    let palette = alpha_palette(u32::from(bitstring[0]), u32::from(bitstring[1]));
    let indices = three_bit_indices(&bitstring[2..8]);
    if flags.0 != 0 {
        let all_opaque = indices.iter().all(|&i| palette[i as usize] == 0xFF);
        if all_opaque && flags.contains(DecodeFlags::NON_OPAQUE_ONLY) {
            return Err(TextureError::InvalidBlock("opaque block filtered out"));
        }
        if !all_opaque && flags.contains(DecodeFlags::OPAQUE_ONLY) {
            return Err(TextureError::InvalidBlock("transparent block filtered out"));
        }
    }
    decode_bc1_colors(&bitstring[8..16], true, false, out);
    for (i, idx) in indices.iter().enumerate() {
        out[i * 4 + 3] = palette[*idx as usize];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 5:6:5 pure red and pure green endpoints.
    const RED: u16 = 0xF800;
    const GREEN: u16 = 0x07E0;

    fn bc1_block(color0: u16, color1: u16, indices: u32) -> [u8; 8] {
        let mut b = [0u8; 8];
        b[0..2].copy_from_slice(&color0.to_le_bytes());
        b[2..4].copy_from_slice(&color1.to_le_bytes());
        b[4..8].copy_from_slice(&indices.to_le_bytes());
        b
    }

    #[test]
    fn bc1_four_color_interpolation() {
        // Indices 0,1,2,3 repeating per row of four pixels.
        let block = bc1_block(RED, GREEN, 0xE4E4_E4E4);
        let mut out = [0u8; 64];
        decode_bc1(&block, ModeMask::ALL, DecodeFlags::NONE, &mut out).unwrap();
        assert_eq!(&out[0..4], &[255, 0, 0, 255]);
        assert_eq!(&out[4..8], &[0, 255, 0, 255]);
        // (2*255+0)/3 rounded = 170; (2*0+255)/3 rounded = 85
        assert_eq!(&out[8..12], &[170, 85, 0, 255]);
        assert_eq!(&out[12..16], &[85, 170, 0, 255]);
    }

    #[test]
    fn bc1_three_color_black_stays_opaque() {
        // color0 <= color1 selects three-color mode; index 3 is black.
        let block = bc1_block(GREEN, RED, 0xFFFF_FFFF);
        let mut out = [0u8; 64];
        decode_bc1(&block, ModeMask::ALL, DecodeFlags::NONE, &mut out).unwrap();
        for px in out.chunks_exact(4) {
            assert_eq!(px, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn bc1a_three_color_index3_is_transparent_black() {
        let block = bc1_block(GREEN, RED, 0xFFFF_FFFF);
        let mut out = [0u8; 64];
        decode_bc1a(&block, ModeMask::ALL, DecodeFlags::NONE, &mut out).unwrap();
        for px in out.chunks_exact(4) {
            assert_eq!(px, &[0, 0, 0, 0]);
        }
    }

    #[test]
    fn bc1a_opacity_filters() {
        let opaque = bc1_block(RED, GREEN, 0);
        let transparent = bc1_block(GREEN, RED, 0);
        let mut out = [0u8; 64];
        assert!(
            decode_bc1a(&opaque, ModeMask::ALL, DecodeFlags::NON_OPAQUE_ONLY, &mut out).is_err()
        );
        assert!(
            decode_bc1a(&transparent, ModeMask::ALL, DecodeFlags::OPAQUE_ONLY, &mut out).is_err()
        );
        assert!(decode_bc1a(&opaque, ModeMask::ALL, DecodeFlags::OPAQUE_ONLY, &mut out).is_ok());
    }

    #[test]
    fn bc2_explicit_alpha_expands_by_17() {
        let mut block = [0u8; 16];
        // Alpha nibbles 0..15 across the block.
        for i in 0..8 {
            block[i] = ((2 * i + 1) << 4 | (2 * i)) as u8;
        }
        // Color section: solid red in always-four-color mode with equal
        // endpoints, which BC1 proper would misread as three-color.
        block[8..10].copy_from_slice(&RED.to_le_bytes());
        block[10..12].copy_from_slice(&RED.to_le_bytes());
        let mut out = [0u8; 64];
        decode_bc2(&block, ModeMask::ALL, DecodeFlags::NONE, &mut out).unwrap();
        for (i, px) in out.chunks_exact(4).enumerate() {
            assert_eq!(px[..3], [255, 0, 0]);
            assert_eq!(px[3], (i * 17) as u8);
        }
    }

    #[test]
    fn bc3_alpha_palette_seven_step() {
        let p = alpha_palette(255, 0);
        assert_eq!(p, [255, 0, 219, 182, 146, 109, 73, 36]);
    }

    #[test]
    fn bc3_alpha_palette_five_step_extremes() {
        let p = alpha_palette(10, 250);
        assert_eq!(p[0], 10);
        assert_eq!(p[1], 250);
        assert_eq!(p[6], 0);
        assert_eq!(p[7], 255);
        // (4*10 + 1*250)/5 = 58
        assert_eq!(p[2], 58);
    }

    #[test]
    fn bc3_block_combines_alpha_and_color() {
        let mut block = [0u8; 16];
        block[0] = 200;
        block[1] = 100;
        // All indices 0: every pixel gets alpha0.
        block[8..10].copy_from_slice(&GREEN.to_le_bytes());
        block[10..12].copy_from_slice(&GREEN.to_le_bytes());
        let mut out = [0u8; 64];
        decode_bc3(&block, ModeMask::ALL, DecodeFlags::NONE, &mut out).unwrap();
        for px in out.chunks_exact(4) {
            assert_eq!(px, &[0, 255, 0, 200]);
        }
    }
}

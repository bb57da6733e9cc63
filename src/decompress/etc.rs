//! ETC1 block decoder and ETC2 placeholders.
//!
//! ETC1 blocks carry two 2×4 (or 4×2) sub-blocks whose base colors come
//! either from two independent 4-bit encodings or from a 5-bit base plus a
//! 3-bit two's-complement difference. Differential encodings that overflow
//! the 5-bit range are invalid blocks.

use super::{DecodeFlags, ModeMask};
use crate::error::TextureError;

const MODIFIER_TABLE: [[i32; 4]; 8] = [
    [2, 8, -2, -8],
    [5, 17, -5, -17],
    [9, 29, -9, -29],
    [13, 42, -13, -42],
    [18, 60, -18, -60],
    [24, 80, -24, -80],
    [33, 106, -33, -106],
    [47, 183, -47, -183],
];

fn clamp_u8(x: i32) -> u8 {
    x.clamp(0, 255) as u8
}

/// The 3-bit two's-complement difference, pre-shifted into the 5-bit
/// base-color position.
fn complement3bit_shifted(x: u32) -> i32 {
    const TABLE: [i32; 8] = [0, 8, 16, 24, -32, -24, -16, -8];
    TABLE[x as usize]
}

/// Write pixel `i` of the block. The two index bit planes sit in a 32-bit
/// word: plane 0 at bit `i`, plane 1 at bit `16 + i`. Pixels are numbered
/// column first, so pixel `i` lands at row `i & 3`, column `i >> 2`.
fn process_pixel(
    i: u32,
    pixel_index_word: u32,
    table_codeword: usize,
    base_color: [i32; 3],
    out: &mut [u8],
) {
    let pixel_index = (((pixel_index_word & (1 << i)) >> i)
        | ((pixel_index_word & (0x10000 << i)) >> (16 + i - 1))) as usize;
    let modifier = MODIFIER_TABLE[table_codeword][pixel_index];
    let offset = (((i & 3) * 4 + (i >> 2)) * 4) as usize;
    out[offset] = clamp_u8(base_color[0] + modifier);
    out[offset + 1] = clamp_u8(base_color[1] + modifier);
    out[offset + 2] = clamp_u8(base_color[2] + modifier);
    out[offset + 3] = 0xFF;
}

pub(super) fn decode_etc1(
    bitstring: &[u8],
    mode_mask: ModeMask,
    _flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    let differential_mode = bitstring[3] & 2 != 0;
    if differential_mode {
        if !mode_mask.allows(ModeMask::ETC_DIFFERENTIAL) {
            return Err(TextureError::InvalidBlock("differential mode masked out"));
        }
    } else if !mode_mask.allows(ModeMask::ETC_INDIVIDUAL) {
        return Err(TextureError::InvalidBlock("individual mode masked out"));
    }
    let flipbit = bitstring[3] & 1 != 0;
    let mut base1 = [0i32; 3];
    let mut base2 = [0i32; 3];
    if differential_mode {
        for c in 0..3 {
            let byte = u32::from(bitstring[c]);
            let mut b1 = (byte & 0xF8) as i32;
            b1 |= (b1 & 224) >> 5;
            base1[c] = b1;
            // 5-bit base plus 3-bit complement difference; any carry out of
            // the 5-bit field invalidates the block.
            let b2 = ((byte & 0xF8) as i32) + complement3bit_shifted(byte & 7);
            if b2 & 0xFF07u32 as i32 != 0 {
                return Err(TextureError::InvalidBlock("differential base overflow"));
            }
            base2[c] = b2 | ((b2 & 224) >> 5);
        }
    } else {
        for c in 0..3 {
            let byte = u32::from(bitstring[c]);
            let b1 = (byte & 0xF0) as i32;
            base1[c] = b1 | (b1 >> 4);
            let b2 = (byte & 0x0F) as i32;
            base2[c] = b2 | (b2 << 4);
        }
    }
    let table_codeword1 = ((bitstring[3] & 224) >> 5) as usize;
    let table_codeword2 = ((bitstring[3] & 28) >> 2) as usize;
    let pixel_index_word = u32::from_be_bytes([
        bitstring[4],
        bitstring[5],
        bitstring[6],
        bitstring[7],
    ]);
    for i in 0..16u32 {
        // Without the flip bit the sub-blocks are the left and right 2×4
        // halves; with it, the top and bottom 4×2 halves.
        let second = if flipbit { i & 2 != 0 } else { i >= 8 };
        let (codeword, base) = if second {
            (table_codeword2, base2)
        } else {
            (table_codeword1, base1)
        };
        process_pixel(i, pixel_index_word, codeword, base, out);
    }
    Ok(())
}

pub(super) fn decode_etc2(
    _bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    _out: &mut [u8],
) -> Result<(), TextureError> {
    Err(TextureError::UnsupportedTextureFormat(
        crate::format::TextureFormat::Etc2,
    ))
}

pub(super) fn decode_etc2_punchthrough(
    _bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    _out: &mut [u8],
) -> Result<(), TextureError> {
    Err(TextureError::UnsupportedTextureFormat(
        crate::format::TextureFormat::Etc2Punchthrough,
    ))
}

pub(super) fn decode_etc2_eac(
    _bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    _out: &mut [u8],
) -> Result<(), TextureError> {
    Err(TextureError::UnsupportedTextureFormat(
        crate::format::TextureFormat::Etc2Eac,
    ))
}

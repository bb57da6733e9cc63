//! EAC single- and dual-channel 11-bit block decoders.
//!
//! Each 8-byte channel block holds a base codeword, a multiplier and
//! modifier-table selector, and 16 3-bit indices stored most significant
//! bit first. Unsigned channels work in a 0..2047 domain and widen to u16
//! by bit replication; signed channels work in -1023..1023 and rescale to
//! snorm16.

use super::{DecodeFlags, ModeMask};
use crate::error::TextureError;

const MODIFIER_TABLE: [[i32; 8]; 16] = [
    [-3, -6, -9, -15, 2, 5, 8, 14],
    [-3, -7, -10, -13, 2, 6, 9, 12],
    [-2, -5, -8, -13, 1, 4, 7, 12],
    [-2, -4, -6, -13, 1, 3, 5, 12],
    [-3, -6, -8, -12, 2, 5, 7, 11],
    [-3, -7, -9, -11, 2, 6, 8, 10],
    [-4, -7, -8, -11, 3, 6, 7, 10],
    [-3, -5, -8, -11, 2, 4, 7, 10],
    [-2, -6, -8, -10, 1, 5, 7, 9],
    [-2, -5, -8, -10, 1, 4, 7, 9],
    [-2, -4, -8, -10, 1, 3, 7, 9],
    [-2, -5, -7, -10, 1, 4, 6, 9],
    [-3, -4, -7, -10, 2, 3, 6, 9],
    [-1, -2, -3, -10, 0, 1, 2, 9],
    [-4, -6, -8, -9, 3, 5, 7, 8],
    [-3, -5, -7, -9, 2, 4, 6, 8],
];

fn clamp2047(x: i32) -> i32 {
    x.clamp(0, 2047)
}

fn clamp1023_signed(x: i32) -> i32 {
    x.clamp(-1023, 1023)
}

/// Pixel `i`'s 3-bit index from the 48-bit index section (bytes 2..8),
/// most significant bits first.
fn index_of(block: &[u8], i: u32) -> usize {
    let mut bits: u64 = 0;
    for b in &block[2..8] {
        bits = (bits << 8) | u64::from(*b);
    }
    ((bits >> (45 - i * 3)) & 7) as usize
}

/// Pixels are numbered column first, like the ETC index planes.
fn pixel_offset(i: u32) -> usize {
    ((i & 3) * 4 + (i >> 2)) as usize
}

/// Decode one unsigned channel block with a stride in 16-bit units.
fn decode_channel_u16(block: &[u8], out: &mut [u8], stride: usize) {
    let base = i32::from(block[0]);
    let multiplier = i32::from(block[1] >> 4);
    let table = usize::from(block[1] & 0xF);
    for i in 0..16u32 {
        let modifier = MODIFIER_TABLE[table][index_of(block, i)];
        let scale = if multiplier == 0 { 1 } else { multiplier * 8 };
        let v = clamp2047(base * 8 + 4 + modifier * scale) as u16;
        // Replicate the 11-bit value across 16 bits.
        let wide = (v << 5) | (v >> 6);
        let o = pixel_offset(i) * stride * 2;
        out[o..o + 2].copy_from_slice(&wide.to_ne_bytes());
    }
}

/// Decode one signed channel block as snorm16 with a stride in 16-bit
/// units. The -128 base encoding clamps to -127.
fn decode_channel_i16(block: &[u8], out: &mut [u8], stride: usize) {
    let base = i32::from(block[0] as i8).max(-127);
    let multiplier = i32::from(block[1] >> 4);
    let table = usize::from(block[1] & 0xF);
    for i in 0..16u32 {
        let modifier = MODIFIER_TABLE[table][index_of(block, i)];
        let scale = if multiplier == 0 { 1 } else { multiplier * 8 };
        let v = clamp1023_signed(base * 8 + modifier * scale);
        let wide = (v * 32767 / 1023) as i16;
        let o = pixel_offset(i) * stride * 2;
        out[o..o + 2].copy_from_slice(&wide.to_ne_bytes());
    }
}

pub(super) fn decode_eac_r11(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    decode_channel_u16(&bitstring[0..8], out, 1);
    Ok(())
}

pub(super) fn decode_eac_signed_r11(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    decode_channel_i16(&bitstring[0..8], out, 1);
    Ok(())
}

pub(super) fn decode_eac_rg11(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    decode_channel_u16(&bitstring[0..8], out, 2);
    decode_channel_u16(&bitstring[8..16], &mut out[2..], 2);
    Ok(())
}

pub(super) fn decode_eac_signed_rg11(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    decode_channel_i16(&bitstring[0..8], out, 2);
    decode_channel_i16(&bitstring[8..16], &mut out[2..], 2);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_base_only() {
        // Base 128, multiplier 1, table 13 whose index-4 modifier is 0.
        let mut block = [0u8; 8];
        block[0] = 128;
        block[1] = 0x1D;
        // Every 3-bit index = 4 (binary 100 repeated).
        let mut bits: u64 = 0;
        for i in 0..16 {
            bits |= 4u64 << (45 - i * 3);
        }
        block[2..8].copy_from_slice(&bits.to_be_bytes()[2..8]);
        let mut out = [0u8; 32];
        decode_eac_r11(&block, ModeMask::ALL, DecodeFlags::NONE, &mut out).unwrap();
        let v11 = 128u16 * 8 + 4;
        let expected = (v11 << 5) | (v11 >> 6);
        for px in out.chunks_exact(2) {
            assert_eq!(u16::from_ne_bytes([px[0], px[1]]), expected);
        }
    }

    #[test]
    fn unsigned_clamps_to_eleven_bits() {
        // Base 255 with a large positive modifier saturates at 2047.
        let mut block = [0u8; 8];
        block[0] = 255;
        block[1] = 0xF0; // multiplier 15, table 0
        // All indices 7: the +14 modifier row entry.
        block[2..8].copy_from_slice(&[0xFF; 6]);
        let mut out = [0u8; 32];
        decode_eac_r11(&block, ModeMask::ALL, DecodeFlags::NONE, &mut out).unwrap();
        let expected = (2047u16 << 5) | (2047u16 >> 6);
        assert_eq!(u16::from_ne_bytes([out[0], out[1]]), expected);
        assert_eq!(expected, 0xFFFF);
    }

    #[test]
    fn signed_extremes_scale_to_snorm16() {
        // Base 127, multiplier 15, table 0, all indices 7 (+14): clamps to
        // 1023 and scales to 32767.
        let mut block = [0u8; 8];
        block[0] = 127;
        block[1] = 0xF0;
        block[2..8].copy_from_slice(&[0xFF; 6]);
        let mut out = [0u8; 32];
        decode_eac_signed_r11(&block, ModeMask::ALL, DecodeFlags::NONE, &mut out).unwrap();
        assert_eq!(i16::from_ne_bytes([out[0], out[1]]), 32767);

        // Base -128 clamps to -127 before scaling.
        block[0] = 0x80;
        block[2..8].copy_from_slice(&[0x6D; 6]); // indices 3 (-15 row 0)
        decode_eac_signed_r11(&block, ModeMask::ALL, DecodeFlags::NONE, &mut out).unwrap();
        let v = i16::from_ne_bytes([out[0], out[1]]);
        assert!(v < -31000);
    }

    #[test]
    fn rg_channels_are_independent() {
        let mut block = [0u8; 16];
        block[0] = 10;
        block[1] = 0x1D;
        block[8] = 100;
        block[9] = 0x1D;
        let mut bits: u64 = 0;
        for i in 0..16 {
            bits |= 4u64 << (45 - i * 3);
        }
        block[2..8].copy_from_slice(&bits.to_be_bytes()[2..8]);
        block[10..16].copy_from_slice(&bits.to_be_bytes()[2..8]);
        let mut out = [0u8; 64];
        decode_eac_rg11(&block, ModeMask::ALL, DecodeFlags::NONE, &mut out).unwrap();
        let r11 = 10u16 * 8 + 4;
        let g11 = 100u16 * 8 + 4;
        for px in out.chunks_exact(4) {
            assert_eq!(
                u16::from_ne_bytes([px[0], px[1]]),
                (r11 << 5) | (r11 >> 6)
            );
            assert_eq!(
                u16::from_ne_bytes([px[2], px[3]]),
                (g11 << 5) | (g11 >> 6)
            );
        }
    }
}

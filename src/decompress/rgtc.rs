//! RGTC block decoders (BC4/BC5, unsigned and signed).
//!
//! Unsigned channels decode to 8-bit; signed channels decode to snorm16,
//! with the -127..127 endpoint domain rescaled by 32767/127.

use super::bc::{alpha_palette, three_bit_indices};
use super::{DecodeFlags, ModeMask, div5_round_signed, div7_round_signed};
use crate::error::TextureError;

/// Decode one 8-byte unsigned channel block into `out` with the given
/// per-pixel stride.
fn decode_channel_u8(block: &[u8], out: &mut [u8], stride: usize) {
    let palette = alpha_palette(u32::from(block[0]), u32::from(block[1]));
    let indices = three_bit_indices(&block[2..8]);
    for (i, idx) in indices.iter().enumerate() {
        out[i * stride] = palette[*idx as usize];
    }
}

/// The signed palette in the -127..127 domain. The -128 endpoint encoding
/// clamps to -127.
fn signed_palette(v0: i32, v1: i32) -> [i32; 8] {
    let v0 = v0.max(-127);
    let v1 = v1.max(-127);
    let mut p = [0i32; 8];
    p[0] = v0;
    p[1] = v1;
    if v0 > v1 {
        for i in 2..8 {
            p[i] = div7_round_signed((8 - i as i32) * v0 + (i as i32 - 1) * v1);
        }
    } else {
        for i in 2..6 {
            p[i] = div5_round_signed((6 - i as i32) * v0 + (i as i32 - 1) * v1);
        }
        p[6] = -127;
        p[7] = 127;
    }
    p
}

fn snorm16(v: i32) -> i16 {
    (v * 32767 / 127) as i16
}

/// Decode one 8-byte signed channel block as snorm16 with a stride in
/// 16-bit units.
fn decode_channel_i16(block: &[u8], out: &mut [u8], stride: usize) {
    let palette = signed_palette(i32::from(block[0] as i8), i32::from(block[1] as i8));
    let indices = three_bit_indices(&block[2..8]);
    for (i, idx) in indices.iter().enumerate() {
        let v = snorm16(palette[*idx as usize]);
        out[i * stride * 2..i * stride * 2 + 2].copy_from_slice(&v.to_ne_bytes());
    }
}

pub(super) fn decode_rgtc1(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    decode_channel_u8(&bitstring[0..8], out, 1);
    Ok(())
}

pub(super) fn decode_rgtc2(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    decode_channel_u8(&bitstring[0..8], out, 2);
    decode_channel_u8(&bitstring[8..16], &mut out[1..], 2);
    Ok(())
}

pub(super) fn decode_signed_rgtc1(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    decode_channel_i16(&bitstring[0..8], out, 1);
    Ok(())
}

pub(super) fn decode_signed_rgtc2(
    bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    out: &mut [u8],
) -> Result<(), TextureError> {
    decode_channel_i16(&bitstring[0..8], out, 2);
    decode_channel_i16(&bitstring[8..16], &mut out[2..], 2);
    Ok(())
}

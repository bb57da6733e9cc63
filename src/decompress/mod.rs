//! Block decompression.
//!
//! Each compressed format decodes a 4×4 block into its canonical pixel
//! format; [`decompress_block`] then converts those 16 pixels into whatever
//! format the caller asked for. Decoders are plain functions selected by a
//! `match` on the texture format.

mod bc;
mod bptc;
mod eac;
mod etc;
mod rgtc;

use crate::convert::Converter;
use crate::error::TextureError;
use crate::format::TextureFormat;
use crate::pixel::PixelFormat;

/// Restricts which encoding modes a decoder will accept. Blocks using a
/// masked-out mode fail with `InvalidBlock` instead of decoding.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ModeMask(pub u32);

impl ModeMask {
    pub const ETC_INDIVIDUAL: ModeMask = ModeMask(0x1);
    pub const ETC_DIFFERENTIAL: ModeMask = ModeMask(0x2);
    pub const ALL_ETC1: ModeMask = ModeMask(0x3);
    pub const ALL: ModeMask = ModeMask(u32::MAX);

    pub const fn allows(self, mode: ModeMask) -> bool {
        self.0 & mode.0 != 0
    }
}

/// Opacity-class filters. A decoder rejects blocks whose decoded opacity
/// doesn't match the requested class.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeFlags(pub u32);

impl DecodeFlags {
    pub const NONE: DecodeFlags = DecodeFlags(0);
    /// Reject blocks containing any non-opaque pixel.
    pub const OPAQUE_ONLY: DecodeFlags = DecodeFlags(0x1);
    /// Reject fully opaque blocks.
    pub const NON_OPAQUE_ONLY: DecodeFlags = DecodeFlags(0x2);

    pub const fn contains(self, flag: DecodeFlags) -> bool {
        self.0 & flag.0 != 0
    }
}

/// One block decoder writing 16 pixels of the canonical format.
pub(crate) type BlockDecodeFn =
    fn(&[u8], ModeMask, DecodeFlags, &mut [u8]) -> Result<(), TextureError>;

/// The decoder and canonical output format for a compressed format.
pub(crate) fn decoder_for(format: TextureFormat) -> (BlockDecodeFn, PixelFormat) {
    let f: BlockDecodeFn = match format {
        TextureFormat::Bc1 => bc::decode_bc1,
        TextureFormat::Bc1a => bc::decode_bc1a,
        TextureFormat::Bc2 => bc::decode_bc2,
        TextureFormat::Bc3 => bc::decode_bc3,
        TextureFormat::Rgtc1 => rgtc::decode_rgtc1,
        TextureFormat::SignedRgtc1 => rgtc::decode_signed_rgtc1,
        TextureFormat::Rgtc2 => rgtc::decode_rgtc2,
        TextureFormat::SignedRgtc2 => rgtc::decode_signed_rgtc2,
        TextureFormat::Bptc => bptc::decode_bptc,
        TextureFormat::BptcFloat => bptc::decode_bptc_float,
        TextureFormat::BptcSignedFloat => bptc::decode_bptc_signed_float,
        TextureFormat::Etc1 => etc::decode_etc1,
        TextureFormat::Etc2 => etc::decode_etc2,
        TextureFormat::Etc2Punchthrough => etc::decode_etc2_punchthrough,
        TextureFormat::Etc2Eac => etc::decode_etc2_eac,
        TextureFormat::EacR11 => eac::decode_eac_r11,
        TextureFormat::EacSignedR11 => eac::decode_eac_signed_r11,
        TextureFormat::EacRg11 => eac::decode_eac_rg11,
        TextureFormat::EacSignedRg11 => eac::decode_eac_signed_rg11,
    };
    (f, format.decoded_format())
}

/// Largest decoded block: 16 pixels at 16 bytes each.
pub(crate) const MAX_DECODED_BLOCK_SIZE: usize = 256;

/// Decompress one 4×4 block into `out` in `out_format`.
///
/// Decode failures (`InvalidBlock`, `UnsupportedTextureFormat`) are distinct
/// from conversion failures (`UnsupportedConversion`); tiled decoding treats
/// only the former as per-block and the latter as fatal.
pub fn decompress_block(
    bitstring: &[u8],
    texture_format: TextureFormat,
    mode_mask: ModeMask,
    flags: DecodeFlags,
    out: &mut [u8],
    out_format: PixelFormat,
    converter: &mut Converter,
) -> Result<(), TextureError> {
    if bitstring.len() < texture_format.block_size() {
        return Err(TextureError::UnexpectedEof);
    }
    let (decode, decoded_format) = decoder_for(texture_format);
    let mut scratch = [0u8; MAX_DECODED_BLOCK_SIZE];
    let decoded_len = 16 * decoded_format.pixel_size();
    decode(bitstring, mode_mask, flags, &mut scratch[..decoded_len])?;
    converter.convert(
        &mut scratch[..decoded_len],
        decoded_format,
        out,
        out_format,
        16,
    )
}

// Rounded integer division as the BC and RGTC interpolants use it.

pub(crate) fn div3_round(v: u32) -> u32 {
    (v + 1) / 3
}

pub(crate) fn div5_round(v: u32) -> u32 {
    (v + 2) / 5
}

pub(crate) fn div7_round(v: u32) -> u32 {
    (v + 3) / 7
}

pub(crate) fn div5_round_signed(v: i32) -> i32 {
    div5_round(v.unsigned_abs()) as i32 * v.signum()
}

pub(crate) fn div7_round_signed(v: i32) -> i32 {
    div7_round(v.unsigned_abs()) as i32 * v.signum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_division_matches_tables() {
        for v in 0..768u32 {
            assert_eq!(div3_round(v), (v as f64 / 3.0).round() as u32);
        }
        for v in 0..1792u32 {
            assert_eq!(div7_round(v), (v as f64 / 7.0).round() as u32);
        }
        for v in 0..1280u32 {
            assert_eq!(div5_round(v), (v as f64 / 5.0).round() as u32);
        }
        assert_eq!(div7_round_signed(-895), -128);
        assert_eq!(div5_round_signed(-3), -1);
    }

    #[test]
    fn stub_formats_fail_cleanly() {
        let block = [0u8; 16];
        let mut out = [0u8; 64];
        let mut conv = Converter::new();
        for format in [
            TextureFormat::Bptc,
            TextureFormat::BptcFloat,
            TextureFormat::BptcSignedFloat,
            TextureFormat::Etc2,
            TextureFormat::Etc2Punchthrough,
            TextureFormat::Etc2Eac,
        ] {
            let err = decompress_block(
                &block[..format.block_size()],
                format,
                ModeMask::ALL,
                DecodeFlags::NONE,
                &mut out,
                crate::pixel::PixelFormat::RGBA8,
                &mut conv,
            )
            .unwrap_err();
            assert!(matches!(err, TextureError::UnsupportedTextureFormat(f) if f == format));
        }
    }

    #[test]
    fn truncated_block_is_rejected() {
        let mut out = [0u8; 64];
        let mut conv = Converter::new();
        let err = decompress_block(
            &[0u8; 4],
            TextureFormat::Bc1,
            ModeMask::ALL,
            DecodeFlags::NONE,
            &mut out,
            crate::pixel::PixelFormat::RGBX8,
            &mut conv,
        )
        .unwrap_err();
        assert!(matches!(err, TextureError::UnexpectedEof));
    }
}

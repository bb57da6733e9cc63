//! BPTC (BC6H/BC7) placeholders.
//!
//! These formats are recognized and dispatched but not yet decoded; the
//! decoders fail explicitly rather than producing garbage pixels, so tiled
//! decoding zeroes their blocks and reports the failure count.

use super::{DecodeFlags, ModeMask};
use crate::error::TextureError;
use crate::format::TextureFormat;

pub(super) fn decode_bptc(
    _bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    _out: &mut [u8],
) -> Result<(), TextureError> {
    Err(TextureError::UnsupportedTextureFormat(TextureFormat::Bptc))
}

pub(super) fn decode_bptc_float(
    _bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    _out: &mut [u8],
) -> Result<(), TextureError> {
    Err(TextureError::UnsupportedTextureFormat(
        TextureFormat::BptcFloat,
    ))
}

pub(super) fn decode_bptc_signed_float(
    _bitstring: &[u8],
    _mode_mask: ModeMask,
    _flags: DecodeFlags,
    _out: &mut [u8],
) -> Result<(), TextureError> {
    Err(TextureError::UnsupportedTextureFormat(
        TextureFormat::BptcSignedFloat,
    ))
}

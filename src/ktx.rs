//! KTX (version 1) container parsing.
//!
//! Decodes the 64-byte header, skips the key/value block, and splits the
//! payload into per-level [`Texture`] values. Big-endian files (endianness
//! word 0x01020304) have every header word and image-size field swapped.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::TextureError;
use crate::format::{Format, TextureFormat};
use crate::limits::Limits;
use crate::pixel::PixelFormat;
use crate::texture::Texture;

const SIGNATURE: [u8; 12] = [
    0xAB, 0x4B, 0x54, 0x58, 0x20, 0x31, 0x31, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A,
];

const HEADER_SIZE: usize = 64;

// Sanity cap guarding block-count arithmetic.
const MAX_DIMENSION: u32 = 1 << 20;

fn read_u32(data: &[u8], offset: usize, swap: bool) -> Result<u32, TextureError> {
    let bytes: [u8; 4] = data
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or(TextureError::UnexpectedEof)?;
    Ok(if swap {
        u32::from_be_bytes(bytes)
    } else {
        u32::from_le_bytes(bytes)
    })
}

/// The texture format a glInternalFormat word denotes.
fn format_for_gl(gl_internal_format: u32) -> Option<Format> {
    let format = match gl_internal_format {
        // S3TC
        0x83F0 => Format::Compressed(TextureFormat::Bc1),
        0x83F1 => Format::Compressed(TextureFormat::Bc1a),
        0x83F2 => Format::Compressed(TextureFormat::Bc2),
        0x83F3 => Format::Compressed(TextureFormat::Bc3),
        // RGTC
        0x8DBB => Format::Compressed(TextureFormat::Rgtc1),
        0x8DBC => Format::Compressed(TextureFormat::SignedRgtc1),
        0x8DBD => Format::Compressed(TextureFormat::Rgtc2),
        0x8DBE => Format::Compressed(TextureFormat::SignedRgtc2),
        // BPTC
        0x8E8C => Format::Compressed(TextureFormat::Bptc),
        0x8E8E => Format::Compressed(TextureFormat::BptcSignedFloat),
        0x8E8F => Format::Compressed(TextureFormat::BptcFloat),
        // ETC/EAC
        0x8D64 => Format::Compressed(TextureFormat::Etc1),
        0x9274 => Format::Compressed(TextureFormat::Etc2),
        0x9276 => Format::Compressed(TextureFormat::Etc2Punchthrough),
        0x9278 => Format::Compressed(TextureFormat::Etc2Eac),
        0x9270 => Format::Compressed(TextureFormat::EacR11),
        0x9271 => Format::Compressed(TextureFormat::EacSignedR11),
        0x9272 => Format::Compressed(TextureFormat::EacRg11),
        0x9273 => Format::Compressed(TextureFormat::EacSignedRg11),
        // Uncompressed sized formats
        0x8051 => Format::Pixels(PixelFormat::RGB8),
        0x8058 => Format::Pixels(PixelFormat::RGBA8),
        0x8229 => Format::Pixels(PixelFormat::R8),
        0x822B => Format::Pixels(PixelFormat::RG8),
        0x822D => Format::Pixels(PixelFormat::FLOAT_R16),
        0x822F => Format::Pixels(PixelFormat::FLOAT_RG16),
        0x881A => Format::Pixels(PixelFormat::FLOAT_RGBA16),
        0x822E => Format::Pixels(PixelFormat::FLOAT_R32),
        0x8230 => Format::Pixels(PixelFormat::FLOAT_RG32),
        0x8814 => Format::Pixels(PixelFormat::FLOAT_RGBA32),
        _ => return None,
    };
    Some(format)
}

/// Decode up to `max_levels` mip levels from a KTX byte slice.
pub fn decode_mipmaps(
    data: &[u8],
    max_levels: usize,
    limits: &Limits,
) -> Result<Vec<Texture>, TextureError> {
    if data.len() < HEADER_SIZE {
        return Err(TextureError::UnexpectedEof);
    }
    if data[..12] != SIGNATURE {
        return Err(TextureError::InvalidHeader(String::from(
            "KTX signature not found",
        )));
    }
    let swap = read_u32(data, 12, false)? == 0x01020304;
    if !swap && read_u32(data, 12, false)? != 0x04030201 {
        return Err(TextureError::InvalidHeader(String::from(
            "bad KTX endianness word",
        )));
    }
    let gl_internal_format = read_u32(data, 7 * 4, swap)?;
    let format = format_for_gl(gl_internal_format).ok_or_else(|| {
        TextureError::UnsupportedVariant(alloc::format!(
            "glInternalFormat {gl_internal_format:#06x}"
        ))
    })?;
    let mut width = read_u32(data, 9 * 4, swap)?;
    let mut height = read_u32(data, 10 * 4, swap)?;
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(TextureError::DimensionsTooLarge { width, height });
    }
    limits.check(width, height)?;
    let file_levels = read_u32(data, 14 * 4, swap)?.max(1) as usize;
    let kv_bytes = read_u32(data, 15 * 4, swap)? as usize;
    let levels = file_levels.min(max_levels);

    let mut offset = HEADER_SIZE
        .checked_add(kv_bytes)
        .ok_or(TextureError::UnexpectedEof)?;
    let block_width = format.block_width() as u32;
    let bytes_per_block = format.bytes_per_block();
    let mut textures = Vec::with_capacity(levels);
    for level in 0..levels {
        let image_size = read_u32(data, offset, swap)? as usize;
        offset += 4;
        let blocks =
            (width.div_ceil(block_width) as usize) * (height.div_ceil(block_width) as usize);
        limits.check_blocks(blocks)?;
        let expected = blocks * bytes_per_block;
        if image_size != expected {
            return Err(TextureError::InvalidHeader(alloc::format!(
                "image size of level {level} is {image_size}, expected {expected}"
            )));
        }
        limits.check_memory(expected)?;
        let bytes = data
            .get(offset..offset + expected)
            .ok_or(TextureError::UnexpectedEof)?;
        textures.push(Texture::new(format, width, height, bytes.to_vec())?);
        offset += expected;
        width >>= 1;
        height >>= 1;
        if level + 1 < levels {
            // Mip padding to 4-byte alignment.
            offset += 3 - ((image_size + 3) % 4);
        }
    }
    Ok(textures)
}

/// Decode the first mip level from a KTX byte slice.
pub fn decode(data: &[u8], limits: &Limits) -> Result<Texture, TextureError> {
    let mut textures = decode_mipmaps(data, 1, limits)?;
    textures.pop().ok_or(TextureError::UnexpectedEof)
}

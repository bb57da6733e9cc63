//! DDS container parsing.
//!
//! Decodes the legacy 124-byte little-endian header, the optional DX10
//! extension, and splits the payload into per-level [`Texture`] values.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::TextureError;
use crate::format::{Format, TextureFormat};
use crate::limits::Limits;
use crate::texture::Texture;

const MAGIC: &[u8; 4] = b"DDS ";
const HEADER_SIZE: usize = 124;

// DDSD_MIPMAPCOUNT
const FLAG_MIPMAP_COUNT: u32 = 0x20000;
// DDPF_FOURCC
const PF_FOURCC: u32 = 0x4;

const MAX_DIMENSION: u32 = 1 << 20;

fn read_u32(data: &[u8], offset: usize) -> Result<u32, TextureError> {
    let bytes: [u8; 4] = data
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or(TextureError::UnexpectedEof)?;
    Ok(u32::from_le_bytes(bytes))
}

fn format_for_four_cc(four_cc: &[u8; 4]) -> Option<TextureFormat> {
    let format = match four_cc {
        b"DXT1" => TextureFormat::Bc1,
        b"DXT3" => TextureFormat::Bc2,
        b"DXT5" => TextureFormat::Bc3,
        b"ATI1" | b"BC4U" => TextureFormat::Rgtc1,
        b"BC4S" => TextureFormat::SignedRgtc1,
        b"ATI2" | b"BC5U" => TextureFormat::Rgtc2,
        b"BC5S" => TextureFormat::SignedRgtc2,
        _ => return None,
    };
    Some(format)
}

fn format_for_dxgi(dxgi_format: u32) -> Option<TextureFormat> {
    // DXGI_FORMAT_BCn_* as laid out in dxgiformat.h.
    let format = match dxgi_format {
        71 => TextureFormat::Bc1,
        74 => TextureFormat::Bc2,
        77 => TextureFormat::Bc3,
        80 => TextureFormat::Rgtc1,
        81 => TextureFormat::SignedRgtc1,
        83 => TextureFormat::Rgtc2,
        84 => TextureFormat::SignedRgtc2,
        95 => TextureFormat::BptcFloat,
        96 => TextureFormat::BptcSignedFloat,
        98 => TextureFormat::Bptc,
        _ => return None,
    };
    Some(format)
}

/// Decode up to `max_levels` mip levels from a DDS byte slice.
pub fn decode_mipmaps(
    data: &[u8],
    max_levels: usize,
    limits: &Limits,
) -> Result<Vec<Texture>, TextureError> {
    if data.len() < 4 + HEADER_SIZE {
        return Err(TextureError::UnexpectedEof);
    }
    if &data[..4] != MAGIC {
        return Err(TextureError::InvalidHeader(String::from(
            "DDS signature not found",
        )));
    }
    let header = &data[4..4 + HEADER_SIZE];
    let flags = read_u32(header, 4)?;
    let mut height = read_u32(header, 8)?;
    let mut width = read_u32(header, 12)?;
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(TextureError::DimensionsTooLarge { width, height });
    }
    limits.check(width, height)?;
    let pixel_format_flags = read_u32(header, 76)?;
    if pixel_format_flags & PF_FOURCC == 0 {
        return Err(TextureError::UnsupportedVariant(String::from(
            "uncompressed DDS pixel formats",
        )));
    }
    let four_cc: [u8; 4] = header[80..84].try_into().map_err(|_| TextureError::UnexpectedEof)?;

    let mut offset = 4 + HEADER_SIZE;
    let texture_format = if &four_cc == b"DX10" {
        let dxgi_format = read_u32(data, offset)?;
        let resource_dimension = read_u32(data, offset + 4)?;
        offset += 20;
        // D3D10_RESOURCE_DIMENSION_TEXTURE2D
        if resource_dimension != 3 {
            return Err(TextureError::UnsupportedVariant(String::from(
                "only 2D DDS textures are supported",
            )));
        }
        format_for_dxgi(dxgi_format).ok_or_else(|| {
            TextureError::UnsupportedVariant(alloc::format!("DXGI format {dxgi_format}"))
        })?
    } else {
        format_for_four_cc(&four_cc).ok_or_else(|| {
            TextureError::UnsupportedVariant(alloc::format!(
                "fourCC {}",
                four_cc.map(|b| b as char).iter().collect::<String>()
            ))
        })?
    };
    let format = Format::Compressed(texture_format);

    let file_levels = if flags & FLAG_MIPMAP_COUNT != 0 {
        read_u32(header, 24)?.max(1) as usize
    } else {
        1
    };
    let levels = file_levels.min(max_levels);
    let bytes_per_block = format.bytes_per_block();
    let mut textures = Vec::with_capacity(levels);
    for _ in 0..levels {
        let blocks = (width.div_ceil(4) as usize) * (height.div_ceil(4) as usize);
        limits.check_blocks(blocks)?;
        let size = blocks * bytes_per_block;
        limits.check_memory(size)?;
        let bytes = data
            .get(offset..offset + size)
            .ok_or(TextureError::UnexpectedEof)?;
        textures.push(Texture::new(format, width, height, bytes.to_vec())?);
        offset += size;
        width >>= 1;
        height >>= 1;
    }
    Ok(textures)
}

/// Decode the first mip level from a DDS byte slice.
pub fn decode(data: &[u8], limits: &Limits) -> Result<Texture, TextureError> {
    let mut textures = decode_mipmaps(data, 1, limits)?;
    textures.pop().ok_or(TextureError::UnexpectedEof)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_dds(four_cc: &[u8; 4], width: u32, height: u32, levels: u32, payload: &[u8]) -> Vec<u8> {
        let mut out = MAGIC.to_vec();
        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&124u32.to_le_bytes());
        let flags = if levels > 1 { FLAG_MIPMAP_COUNT } else { 0 };
        header[4..8].copy_from_slice(&flags.to_le_bytes());
        header[8..12].copy_from_slice(&height.to_le_bytes());
        header[12..16].copy_from_slice(&width.to_le_bytes());
        header[24..28].copy_from_slice(&levels.to_le_bytes());
        header[76..80].copy_from_slice(&PF_FOURCC.to_le_bytes());
        header[80..84].copy_from_slice(four_cc);
        out.extend_from_slice(&header);
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn decodes_dxt1_single_level() {
        let file = build_dds(b"DXT1", 8, 4, 1, &[0u8; 16]);
        let tex = decode(&file, &Limits::default()).unwrap();
        assert_eq!(tex.format(), Format::Compressed(TextureFormat::Bc1));
        assert_eq!(tex.width_in_blocks(), 2);
        assert_eq!(tex.data().len(), 16);
    }

    #[test]
    fn decodes_mip_chain_with_block_aligned_levels() {
        // 8x8 BC3: level 0 is 4 blocks (64 bytes), levels 1 and 2 one block.
        let payload = [0u8; 64 + 16 + 16];
        let file = build_dds(b"DXT5", 8, 8, 3, &payload);
        let textures = decode_mipmaps(&file, 16, &Limits::default()).unwrap();
        assert_eq!(textures.len(), 3);
        assert_eq!(textures[1].width(), 4);
        // 2x2 still occupies one whole block
        assert_eq!(textures[2].width(), 2);
        assert_eq!(textures[2].data().len(), 16);
    }

    #[test]
    fn dx10_extension_selects_dxgi_format() {
        let mut file = build_dds(b"DX10", 4, 4, 1, &[]);
        let mut ext = [0u8; 20];
        ext[0..4].copy_from_slice(&80u32.to_le_bytes()); // BC4_UNORM
        ext[4..8].copy_from_slice(&3u32.to_le_bytes());
        file.extend_from_slice(&ext);
        file.extend_from_slice(&[0u8; 8]);
        let tex = decode(&file, &Limits::default()).unwrap();
        assert_eq!(tex.format(), Format::Compressed(TextureFormat::Rgtc1));
    }

    #[test]
    fn dx10_rejects_non_2d_resources() {
        let mut file = build_dds(b"DX10", 4, 4, 1, &[]);
        let mut ext = [0u8; 20];
        ext[0..4].copy_from_slice(&80u32.to_le_bytes());
        ext[4..8].copy_from_slice(&4u32.to_le_bytes()); // Texture3D
        file.extend_from_slice(&ext);
        assert!(matches!(
            decode(&file, &Limits::default()),
            Err(TextureError::UnsupportedVariant(_))
        ));
    }

    #[test]
    fn rejects_unknown_four_cc() {
        let file = build_dds(b"XXXX", 4, 4, 1, &[0u8; 8]);
        assert!(matches!(
            decode(&file, &Limits::default()),
            Err(TextureError::UnsupportedVariant(_))
        ));
    }

    #[test]
    fn honors_block_limit() {
        let file = build_dds(b"DXT1", 8, 8, 1, &[0u8; 32]); // 4 blocks
        let limits = Limits {
            max_blocks: Some(3),
            ..Limits::default()
        };
        assert!(matches!(
            decode(&file, &limits),
            Err(TextureError::LimitExceeded(_))
        ));
    }

    #[test]
    fn truncated_payload_is_eof() {
        let file = build_dds(b"DXT1", 8, 8, 1, &[0u8; 16]); // needs 32
        assert!(matches!(
            decode(&file, &Limits::default()),
            Err(TextureError::UnexpectedEof)
        ));
    }
}

//! Whole-texture decoding.
//!
//! A [`Texture`] owns one mip level's bytes plus its dimensions. Compressed
//! textures decode block by block; a corrupt block becomes a zeroed output
//! block and is counted, never aborting the rest of the image.

use alloc::vec;
use alloc::vec::Vec;

use crate::convert::{Converter, convert_pixels};
use crate::decompress::{DecodeFlags, ModeMask, decompress_block};
use crate::error::TextureError;
use crate::format::{Format, TextureFormat};
use crate::pixel::PixelFormat;

/// One level of texture data with its dimensions.
#[derive(Clone, Debug)]
pub struct Texture {
    format: Format,
    width: u32,
    height: u32,
    width_in_blocks: u32,
    height_in_blocks: u32,
    data: Vec<u8>,
}

impl Texture {
    /// Wrap texture bytes, validating that `data` holds exactly the bytes
    /// the dimensions require (blocks × block size for compressed formats,
    /// width × height × pixel size otherwise).
    pub fn new(format: Format, width: u32, height: u32, data: Vec<u8>) -> Result<Texture, TextureError> {
        let block_width = format.block_width() as u32;
        let width_in_blocks = width.div_ceil(block_width);
        let height_in_blocks = height.div_ceil(block_width);
        let needed = width_in_blocks as usize * height_in_blocks as usize * format.bytes_per_block();
        if data.len() != needed {
            return Err(TextureError::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(Texture {
            format,
            width,
            height,
            width_in_blocks,
            height_in_blocks,
            data,
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width_in_blocks(&self) -> u32 {
        self.width_in_blocks
    }

    pub fn height_in_blocks(&self) -> u32 {
        self.height_in_blocks
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Decode to `out_format` with one row of pixels per image row.
    ///
    /// Uncompressed textures convert directly. The output covers the
    /// block-aligned extent (`width_in_blocks * 4` columns for compressed
    /// formats), which equals the nominal size when the dimensions are
    /// multiples of four.
    pub fn decode(&self, out_format: PixelFormat) -> Result<DecodedTexture, TextureError> {
        match self.format {
            Format::Compressed(tf) => decompress_texture_linear(
                &self.data,
                tf,
                self.width_in_blocks,
                self.height_in_blocks,
                out_format,
            ),
            Format::Pixels(pf) => {
                let n = self.width as usize * self.height as usize;
                let mut pixels = vec![0u8; n * out_format.pixel_size()];
                convert_pixels(&self.data, pf, &mut pixels, out_format, n)?;
                Ok(DecodedTexture {
                    pixels,
                    all_blocks_ok: true,
                    failed_blocks: 0,
                })
            }
        }
    }

    /// Decode to `out_format` with each 4×4 block's pixels contiguous.
    /// Only meaningful for compressed textures.
    pub fn decode_tiled(&self, out_format: PixelFormat) -> Result<DecodedTexture, TextureError> {
        match self.format {
            Format::Compressed(tf) => decompress_texture_tiled(
                &self.data,
                tf,
                self.width_in_blocks,
                self.height_in_blocks,
                out_format,
            ),
            Format::Pixels(_) => self.decode(out_format),
        }
    }
}

/// The result of decoding a texture: pixel bytes plus per-block failure
/// accounting.
#[derive(Clone, Debug)]
pub struct DecodedTexture {
    pub pixels: Vec<u8>,
    /// False when any block failed to decode and was zeroed.
    pub all_blocks_ok: bool,
    pub failed_blocks: usize,
}

fn block_decode_failed(err: &TextureError) -> bool {
    matches!(
        err,
        TextureError::InvalidBlock(_) | TextureError::UnsupportedTextureFormat(_)
    )
}

fn check_data_len(data: &[u8], blocks: usize, block_size: usize) -> Result<(), TextureError> {
    let needed = blocks * block_size;
    if data.len() < needed {
        return Err(TextureError::BufferTooSmall {
            needed,
            actual: data.len(),
        });
    }
    Ok(())
}

fn check_reachable(
    texture_format: TextureFormat,
    out_format: PixelFormat,
) -> Result<(), TextureError> {
    let decoded = texture_format.decoded_format();
    if !Converter::supported(decoded, out_format) {
        return Err(TextureError::UnsupportedConversion {
            from: decoded,
            to: out_format,
        });
    }
    Ok(())
}

/// Decode a compressed texture with each block's 16 pixels stored
/// contiguously, block after block in row-major block order.
pub fn decompress_texture_tiled(
    data: &[u8],
    texture_format: TextureFormat,
    width_in_blocks: u32,
    height_in_blocks: u32,
    out_format: PixelFormat,
) -> Result<DecodedTexture, TextureError> {
    check_reachable(texture_format, out_format)?;
    let block_size = texture_format.block_size();
    let pixel_size = out_format.pixel_size();
    let out_block = 16 * pixel_size;
    let blocks = width_in_blocks as usize * height_in_blocks as usize;
    check_data_len(data, blocks, block_size)?;
    let mut pixels = vec![0u8; blocks * out_block];
    let mut converter = Converter::new();
    let mut failed_blocks = 0usize;
    let mut offset = 0usize;
    for out in pixels.chunks_exact_mut(out_block) {
        let bitstring = &data[offset..offset + block_size];
        if let Err(err) = decompress_block(
            bitstring,
            texture_format,
            ModeMask::ALL,
            DecodeFlags::NONE,
            out,
            out_format,
            &mut converter,
        ) {
            if !block_decode_failed(&err) {
                return Err(err);
            }
            out.fill(0);
            failed_blocks += 1;
        }
        offset += block_size;
    }
    Ok(DecodedTexture {
        pixels,
        all_blocks_ok: failed_blocks == 0,
        failed_blocks,
    })
}

/// Decode a compressed texture into a row-major image,
/// `width_in_blocks * 4` pixels wide.
pub fn decompress_texture_linear(
    data: &[u8],
    texture_format: TextureFormat,
    width_in_blocks: u32,
    height_in_blocks: u32,
    out_format: PixelFormat,
) -> Result<DecodedTexture, TextureError> {
    check_reachable(texture_format, out_format)?;
    let block_size = texture_format.block_size();
    let pixel_size = out_format.pixel_size();
    let blocks = width_in_blocks as usize * height_in_blocks as usize;
    check_data_len(data, blocks, block_size)?;
    let row_stride = width_in_blocks as usize * 4 * pixel_size;
    let mut pixels = vec![0u8; row_stride * height_in_blocks as usize * 4];
    let mut block_buffer = [0u8; 16 * 16];
    let mut converter = Converter::new();
    let mut failed_blocks = 0usize;
    let mut offset = 0usize;
    for y in 0..height_in_blocks as usize {
        for x in 0..width_in_blocks as usize {
            let out = &mut block_buffer[..16 * pixel_size];
            let bitstring = &data[offset..offset + block_size];
            if let Err(err) = decompress_block(
                bitstring,
                texture_format,
                ModeMask::ALL,
                DecodeFlags::NONE,
                out,
                out_format,
                &mut converter,
            ) {
                if !block_decode_failed(&err) {
                    return Err(err);
                }
                out.fill(0);
                failed_blocks += 1;
            }
            let base = y * 4 * row_stride + x * 4 * pixel_size;
            for row in 0..4 {
                let dst = base + row * row_stride;
                pixels[dst..dst + 4 * pixel_size]
                    .copy_from_slice(&out[row * 4 * pixel_size..(row + 1) * 4 * pixel_size]);
            }
            offset += block_size;
        }
    }
    Ok(DecodedTexture {
        pixels,
        all_blocks_ok: failed_blocks == 0,
        failed_blocks,
    })
}

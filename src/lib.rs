//! # zentex
//!
//! Decoder for block-compressed GPU texture formats, plus a table-driven
//! pixel-format converter.
//!
//! ## Decoding
//!
//! BC1/BC1A/BC2/BC3, RGTC (BC4/BC5, unsigned and signed), ETC1 and the
//! EAC 11-bit channel formats decode bit-exactly from 4×4 blocks. BPTC
//! (BC6H/BC7) and the ETC2 color formats are recognized and dispatched but
//! fail explicitly instead of producing garbage. Whole textures decode
//! either tiled (block after block) or linear (row-major image), and a
//! corrupt block becomes a zeroed output block rather than aborting the
//! rest of the image.
//!
//! ## Pixel conversion
//!
//! Conversions between the supported pixel formats are planned as chains of
//! up to four catalog steps and executed over whole buffers with a bounded
//! number of temporaries. Intermediate formats never drop below the
//! component count both endpoints share.
//!
//! ## Containers
//!
//! KTX 1.1 (`ktx` feature) and DDS (`dds` feature) byte slices parse into
//! mip chains of [`Texture`] values, subject to [`Limits`].
//!
//! ## Non-Goals
//!
//! - Encoding and recompression
//! - PNG or other general image containers
//! - Mipmap generation and GPU upload
//!
//! ## Usage
//!
//! ```no_run
//! use zentex::{Limits, PixelFormat};
//!
//! let data: &[u8] = &[]; // your KTX bytes
//!
//! let texture = zentex::ktx::decode(data, &Limits::default())?;
//! let decoded = texture.decode(PixelFormat::RGBA8)?;
//! if !decoded.all_blocks_ok {
//!     println!("{} corrupt blocks zeroed", decoded.failed_blocks);
//! }
//! # Ok::<(), zentex::TextureError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod convert;
mod decompress;
mod error;
mod format;
mod limits;
mod pixel;
mod texture;

pub mod hdr;

#[cfg(feature = "ktx")]
pub mod ktx;

#[cfg(feature = "dds")]
pub mod dds;

// Re-exports
pub use convert::{Converter, Plan, convert_pixels, convert_pixels_in_place};
pub use decompress::{DecodeFlags, ModeMask, decompress_block};
pub use error::TextureError;
pub use format::{Format, TextureFormat};
pub use limits::Limits;
pub use pixel::{ComponentMasks, PixelFormat};
pub use texture::{
    DecodedTexture, Texture, decompress_texture_linear, decompress_texture_tiled,
};

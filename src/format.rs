//! Compressed texture format identifiers.

use crate::pixel::PixelFormat;

/// A block-compressed texture encoding scheme.
///
/// Every format compresses fixed 4×4 pixel blocks into 8 or 16 bytes and
/// decodes to a fixed canonical [`PixelFormat`]; the conversion machinery
/// reaches any other requested output format from there.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// BC1 (S3TC DXT1), opaque.
    Bc1,
    /// BC1 with 1-bit punch-through alpha (DXT1A).
    Bc1a,
    /// BC2 (DXT3), explicit 4-bit alpha.
    Bc2,
    /// BC3 (DXT5), interpolated alpha.
    Bc3,
    /// RGTC1 / BC4, single unsigned channel.
    Rgtc1,
    /// RGTC1 / BC4, single signed channel.
    SignedRgtc1,
    /// RGTC2 / BC5, two unsigned channels.
    Rgtc2,
    /// RGTC2 / BC5, two signed channels.
    SignedRgtc2,
    /// BPTC_FLOAT / BC6H, unsigned half-float RGB.
    BptcFloat,
    /// BPTC_SIGNED_FLOAT / BC6H, signed half-float RGB.
    BptcSignedFloat,
    /// BPTC / BC7.
    Bptc,
    /// ETC1.
    Etc1,
    /// ETC2 RGB8.
    Etc2,
    /// ETC2 RGB8 with punch-through alpha.
    Etc2Punchthrough,
    /// ETC2 RGB8 + EAC alpha (RGBA8).
    Etc2Eac,
    /// EAC R11, single unsigned channel.
    EacR11,
    /// EAC R11, single signed channel.
    EacSignedR11,
    /// EAC RG11, two unsigned channels.
    EacRg11,
    /// EAC RG11, two signed channels.
    EacSignedRg11,
}

impl TextureFormat {
    /// Compressed bytes per 4×4 block (8 or 16).
    pub const fn block_size(self) -> usize {
        match self {
            TextureFormat::Bc1
            | TextureFormat::Bc1a
            | TextureFormat::Rgtc1
            | TextureFormat::SignedRgtc1
            | TextureFormat::Etc1
            | TextureFormat::Etc2
            | TextureFormat::Etc2Punchthrough
            | TextureFormat::EacR11
            | TextureFormat::EacSignedR11 => 8,
            TextureFormat::Bc2
            | TextureFormat::Bc3
            | TextureFormat::Rgtc2
            | TextureFormat::SignedRgtc2
            | TextureFormat::BptcFloat
            | TextureFormat::BptcSignedFloat
            | TextureFormat::Bptc
            | TextureFormat::Etc2Eac
            | TextureFormat::EacRg11
            | TextureFormat::EacSignedRg11 => 16,
        }
    }

    /// Canonical pixel format a block of this texture format decodes to.
    pub const fn decoded_format(self) -> PixelFormat {
        match self {
            TextureFormat::Bc1 | TextureFormat::Etc1 | TextureFormat::Etc2 => PixelFormat::RGBX8,
            TextureFormat::Bc1a
            | TextureFormat::Bc2
            | TextureFormat::Bc3
            | TextureFormat::Bptc
            | TextureFormat::Etc2Punchthrough
            | TextureFormat::Etc2Eac => PixelFormat::RGBA8,
            TextureFormat::Rgtc1 => PixelFormat::R8,
            TextureFormat::Rgtc2 => PixelFormat::RG8,
            TextureFormat::SignedRgtc1 | TextureFormat::EacSignedR11 => PixelFormat::SIGNED_R16,
            TextureFormat::SignedRgtc2 | TextureFormat::EacSignedRg11 => PixelFormat::SIGNED_RG16,
            TextureFormat::EacR11 => PixelFormat::R16,
            TextureFormat::EacRg11 => PixelFormat::RG16,
            TextureFormat::BptcFloat => PixelFormat::FLOAT_RGBX16,
            TextureFormat::BptcSignedFloat => PixelFormat::SIGNED_FLOAT_RGBX16,
        }
    }

    /// Human-readable format name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            TextureFormat::Bc1 => "BC1",
            TextureFormat::Bc1a => "BC1A",
            TextureFormat::Bc2 => "BC2",
            TextureFormat::Bc3 => "BC3",
            TextureFormat::Rgtc1 => "RGTC1",
            TextureFormat::SignedRgtc1 => "SIGNED_RGTC1",
            TextureFormat::Rgtc2 => "RGTC2",
            TextureFormat::SignedRgtc2 => "SIGNED_RGTC2",
            TextureFormat::BptcFloat => "BPTC_FLOAT",
            TextureFormat::BptcSignedFloat => "BPTC_SIGNED_FLOAT",
            TextureFormat::Bptc => "BPTC",
            TextureFormat::Etc1 => "ETC1",
            TextureFormat::Etc2 => "ETC2",
            TextureFormat::Etc2Punchthrough => "ETC2_PUNCHTHROUGH",
            TextureFormat::Etc2Eac => "ETC2_EAC",
            TextureFormat::EacR11 => "EAC_R11",
            TextureFormat::EacSignedR11 => "EAC_SIGNED_R11",
            TextureFormat::EacRg11 => "EAC_RG11",
            TextureFormat::EacSignedRg11 => "EAC_SIGNED_RG11",
        }
    }
}

/// Storage format of a [`crate::Texture`]: block-compressed or raw pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Compressed(TextureFormat),
    Pixels(PixelFormat),
}

impl Format {
    pub const fn is_compressed(self) -> bool {
        matches!(self, Format::Compressed(_))
    }

    /// Block edge length in pixels: 4 for compressed formats, 1 for raw.
    pub const fn block_width(self) -> usize {
        match self {
            Format::Compressed(_) => 4,
            Format::Pixels(_) => 1,
        }
    }

    /// Stored bytes per block: compressed block size, or one pixel.
    pub const fn bytes_per_block(self) -> usize {
        match self {
            Format::Compressed(tf) => tf.block_size(),
            Format::Pixels(pf) => pf.pixel_size(),
        }
    }
}

use alloc::string::String;

use crate::format::TextureFormat;
use crate::pixel::PixelFormat;

/// Errors from pixel conversion, block decompression, and texture loading.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TextureError {
    #[error("no conversion path from {from:?} to {to:?}")]
    UnsupportedConversion { from: PixelFormat, to: PixelFormat },

    #[error("conversion plan requires more than 3 simultaneous temporary buffers")]
    TooManyTemporaryBuffers,

    #[error("conversion from {from:?} to {to:?} changes pixel size and needs a target buffer")]
    ConversionNotInPlace { from: PixelFormat, to: PixelFormat },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("invalid compressed block: {0}")]
    InvalidBlock(&'static str),

    #[error("texture format {} is not yet supported", .0.name())]
    UnsupportedTextureFormat(TextureFormat),

    #[error("not implemented: {0}")]
    Unimplemented(&'static str),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
}

use crate::error::TextureError;

/// Resource limits applied while parsing containers and sizing decode
/// output. Every limit defaults to unlimited.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Pixel count of the nominal extent (width * height).
    pub max_pixels: Option<u64>,
    /// 4×4 block count per mip level of a compressed texture.
    pub max_blocks: Option<u64>,
    /// Bytes of texture data held per mip level.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), TextureError> {
        check_limit("width", u64::from(width), self.max_width)?;
        check_limit("height", u64::from(height), self.max_height)?;
        check_limit(
            "pixel count",
            u64::from(width) * u64::from(height),
            self.max_pixels,
        )
    }

    pub(crate) fn check_blocks(&self, blocks: usize) -> Result<(), TextureError> {
        check_limit("block count", blocks as u64, self.max_blocks)
    }

    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), TextureError> {
        check_limit("byte size", bytes as u64, self.max_memory_bytes)
    }
}

fn check_limit(what: &str, value: u64, limit: Option<u64>) -> Result<(), TextureError> {
    match limit {
        Some(max) if value > max => Err(TextureError::LimitExceeded(alloc::format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}

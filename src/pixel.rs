//! Uncompressed pixel format descriptors.
//!
//! A [`PixelFormat`] is an opaque code that fully describes the memory layout
//! of one pixel: component count and size, signedness, float encoding,
//! RGB/BGR order, and total byte size. All metadata is derivable from the
//! code alone, so buffers travel as plain `&[u8]` tagged with a format.

use core::fmt;

// Layout of the format code. The low bits are individually testable
// properties; the packed fields make pixel size and component count
// lookups a shift and mask.
const COMPONENT_16BIT: u32 = 0x1;
const COMPONENT_32BIT: u32 = 0x2;
const ALPHA: u32 = 0x4;
const BGR_ORDER: u32 = 0x8;
const SIGNED: u32 = 0x10;
const FLOAT: u32 = 0x20;
const COUNT_SHIFT: u32 = 8;
const COUNT_MASK: u32 = 0x300;
const SIZE_SHIFT: u32 = 12;
const SIZE_MASK: u32 = 0x1F000;

const fn fmt_code(components: u32, size: u32, bits: u32) -> u32 {
    bits | ((components - 1) << COUNT_SHIFT) | (size << SIZE_SHIFT)
}

/// Layout and encoding of one uncompressed pixel.
///
/// Formats are value types; two formats are equal iff their codes are equal.
/// The `X` in formats like [`PixelFormat::RGBX8`] is an opacity padding byte:
/// the pixel occupies 4 bytes but only 3 components carry color.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat(u32);

impl PixelFormat {
    // 8-bit component formats.
    pub const R8: PixelFormat = PixelFormat(fmt_code(1, 1, 0));
    pub const SIGNED_R8: PixelFormat = PixelFormat(fmt_code(1, 1, SIGNED));
    pub const A8: PixelFormat = PixelFormat(fmt_code(1, 1, ALPHA));
    pub const RG8: PixelFormat = PixelFormat(fmt_code(2, 2, 0));
    pub const SIGNED_RG8: PixelFormat = PixelFormat(fmt_code(2, 2, SIGNED));
    pub const RGB8: PixelFormat = PixelFormat(fmt_code(3, 3, 0));
    pub const BGR8: PixelFormat = PixelFormat(fmt_code(3, 3, BGR_ORDER));
    pub const RGBX8: PixelFormat = PixelFormat(fmt_code(3, 4, 0));
    pub const BGRX8: PixelFormat = PixelFormat(fmt_code(3, 4, BGR_ORDER));
    pub const RGBA8: PixelFormat = PixelFormat(fmt_code(4, 4, ALPHA));
    pub const BGRA8: PixelFormat = PixelFormat(fmt_code(4, 4, ALPHA | BGR_ORDER));

    // 16-bit integer component formats (native endian).
    pub const R16: PixelFormat = PixelFormat(fmt_code(1, 2, COMPONENT_16BIT));
    pub const SIGNED_R16: PixelFormat = PixelFormat(fmt_code(1, 2, COMPONENT_16BIT | SIGNED));
    pub const RG16: PixelFormat = PixelFormat(fmt_code(2, 4, COMPONENT_16BIT));
    pub const SIGNED_RG16: PixelFormat = PixelFormat(fmt_code(2, 4, COMPONENT_16BIT | SIGNED));
    pub const RGB16: PixelFormat = PixelFormat(fmt_code(3, 6, COMPONENT_16BIT));
    pub const RGBA16: PixelFormat = PixelFormat(fmt_code(4, 8, COMPONENT_16BIT | ALPHA));
    pub const BGRA16: PixelFormat =
        PixelFormat(fmt_code(4, 8, COMPONENT_16BIT | ALPHA | BGR_ORDER));

    // Half-float component formats.
    pub const FLOAT_R16: PixelFormat = PixelFormat(fmt_code(1, 2, COMPONENT_16BIT | FLOAT));
    pub const FLOAT_RG16: PixelFormat = PixelFormat(fmt_code(2, 4, COMPONENT_16BIT | FLOAT));
    pub const FLOAT_RGB16: PixelFormat = PixelFormat(fmt_code(3, 6, COMPONENT_16BIT | FLOAT));
    pub const FLOAT_RGBX16: PixelFormat = PixelFormat(fmt_code(3, 8, COMPONENT_16BIT | FLOAT));
    pub const SIGNED_FLOAT_RGBX16: PixelFormat =
        PixelFormat(fmt_code(3, 8, COMPONENT_16BIT | FLOAT | SIGNED));
    pub const FLOAT_RGBA16: PixelFormat =
        PixelFormat(fmt_code(4, 8, COMPONENT_16BIT | FLOAT | ALPHA));

    // 32-bit float component formats.
    pub const FLOAT_R32: PixelFormat = PixelFormat(fmt_code(1, 4, COMPONENT_32BIT | FLOAT));
    pub const FLOAT_RG32: PixelFormat = PixelFormat(fmt_code(2, 8, COMPONENT_32BIT | FLOAT));
    pub const FLOAT_RGB32: PixelFormat = PixelFormat(fmt_code(3, 12, COMPONENT_32BIT | FLOAT));
    pub const FLOAT_RGBX32: PixelFormat = PixelFormat(fmt_code(3, 16, COMPONENT_32BIT | FLOAT));
    pub const FLOAT_RGBA32: PixelFormat =
        PixelFormat(fmt_code(4, 16, COMPONENT_32BIT | FLOAT | ALPHA));

    /// Every named format, in declaration order.
    pub const ALL: &'static [PixelFormat] = &[
        Self::R8,
        Self::SIGNED_R8,
        Self::A8,
        Self::RG8,
        Self::SIGNED_RG8,
        Self::RGB8,
        Self::BGR8,
        Self::RGBX8,
        Self::BGRX8,
        Self::RGBA8,
        Self::BGRA8,
        Self::R16,
        Self::SIGNED_R16,
        Self::RG16,
        Self::SIGNED_RG16,
        Self::RGB16,
        Self::RGBA16,
        Self::BGRA16,
        Self::FLOAT_R16,
        Self::FLOAT_RG16,
        Self::FLOAT_RGB16,
        Self::FLOAT_RGBX16,
        Self::SIGNED_FLOAT_RGBX16,
        Self::FLOAT_RGBA16,
        Self::FLOAT_R32,
        Self::FLOAT_RG32,
        Self::FLOAT_RGB32,
        Self::FLOAT_RGBX32,
        Self::FLOAT_RGBA32,
    ];

    /// Total bytes per pixel (1–16).
    pub const fn pixel_size(self) -> usize {
        ((self.0 & SIZE_MASK) >> SIZE_SHIFT) as usize
    }

    /// Number of color/alpha components (1–4). Padding bytes don't count.
    pub const fn component_count(self) -> usize {
        (((self.0 & COUNT_MASK) >> COUNT_SHIFT) + 1) as usize
    }

    /// Bytes per component (1, 2, or 4).
    pub const fn component_size(self) -> usize {
        if self.0 & COMPONENT_32BIT != 0 {
            4
        } else if self.0 & COMPONENT_16BIT != 0 {
            2
        } else {
            1
        }
    }

    /// Whether the format carries an alpha component.
    pub const fn has_alpha(self) -> bool {
        self.0 & ALPHA != 0
    }

    /// Whether components are (half-)floats.
    pub const fn is_float(self) -> bool {
        self.0 & FLOAT != 0
    }

    /// Whether components are signed.
    pub const fn is_signed(self) -> bool {
        self.0 & SIGNED != 0
    }

    /// Whether the sequential component order is BGR rather than RGB.
    pub const fn is_bgr(self) -> bool {
        self.0 & BGR_ORDER != 0
    }

    /// Per-channel bitfield masks, for formats of at most 64 bits per pixel.
    pub fn component_masks(self) -> Option<ComponentMasks> {
        if self.pixel_size() > 8 {
            return None;
        }
        let component_bits = self.component_size() as u32 * 8;
        let count = self.component_count() as u32;
        let mut masks = ComponentMasks::default();
        if count == 1 && self.has_alpha() {
            masks.alpha = bit_range_mask(0, component_bits);
            return Some(masks);
        }
        masks.red = bit_range_mask(0, component_bits);
        if count > 1 {
            masks.green = bit_range_mask(component_bits, component_bits);
        }
        if count > 2 {
            masks.blue = bit_range_mask(component_bits * 2, component_bits);
        }
        if count > 3 {
            masks.alpha = bit_range_mask(component_bits * 3, component_bits);
        }
        if self.is_bgr() {
            core::mem::swap(&mut masks.red, &mut masks.blue);
        }
        Some(masks)
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::R8 => "R8",
            Self::SIGNED_R8 => "SIGNED_R8",
            Self::A8 => "A8",
            Self::RG8 => "RG8",
            Self::SIGNED_RG8 => "SIGNED_RG8",
            Self::RGB8 => "RGB8",
            Self::BGR8 => "BGR8",
            Self::RGBX8 => "RGBX8",
            Self::BGRX8 => "BGRX8",
            Self::RGBA8 => "RGBA8",
            Self::BGRA8 => "BGRA8",
            Self::R16 => "R16",
            Self::SIGNED_R16 => "SIGNED_R16",
            Self::RG16 => "RG16",
            Self::SIGNED_RG16 => "SIGNED_RG16",
            Self::RGB16 => "RGB16",
            Self::RGBA16 => "RGBA16",
            Self::BGRA16 => "BGRA16",
            Self::FLOAT_R16 => "FLOAT_R16",
            Self::FLOAT_RG16 => "FLOAT_RG16",
            Self::FLOAT_RGB16 => "FLOAT_RGB16",
            Self::FLOAT_RGBX16 => "FLOAT_RGBX16",
            Self::SIGNED_FLOAT_RGBX16 => "SIGNED_FLOAT_RGBX16",
            Self::FLOAT_RGBA16 => "FLOAT_RGBA16",
            Self::FLOAT_R32 => "FLOAT_R32",
            Self::FLOAT_RG32 => "FLOAT_RG32",
            Self::FLOAT_RGB32 => "FLOAT_RGB32",
            Self::FLOAT_RGBX32 => "FLOAT_RGBX32",
            Self::FLOAT_RGBA32 => "FLOAT_RGBA32",
            _ => return None,
        })
    }
}

impl fmt::Debug for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "PixelFormat({:#x})", self.0),
        }
    }
}

/// Bitfield masks locating each channel inside a pixel of at most 64 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComponentMasks {
    pub red: u64,
    pub green: u64,
    pub blue: u64,
    pub alpha: u64,
}

/// Mask covering `width` bits starting at `start`.
fn bit_range_mask(start: u32, width: u32) -> u64 {
    debug_assert!(start + width <= 64);
    if start + width == 64 {
        !0u64 ^ ((1u64 << start) - 1)
    } else {
        ((1u64 << (start + width)) - 1) ^ ((1u64 << start) - 1)
    }
}

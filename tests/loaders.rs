//! Container parsing end to end: build file bytes, load, decode pixels.

#![cfg(any(feature = "ktx", feature = "dds"))]

use zentex::{Format, Limits, PixelFormat, TextureFormat};

// Individual-mode ETC1 block decoding to solid (255, 2, 2).
#[cfg(feature = "ktx")]
const ETC1_RED: [u8; 8] = [0xFF, 0, 0, 0, 0, 0, 0, 0];

#[cfg(feature = "ktx")]
fn build_ktx(gl_internal_format: u32, width: u32, height: u32, levels: &[&[u8]]) -> Vec<u8> {
    let mut out = vec![
        0xAB, 0x4B, 0x54, 0x58, 0x20, 0x31, 0x31, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A,
    ];
    let words = [
        0x04030201u32,
        0,
        1,
        0,
        gl_internal_format,
        0,
        width,
        height,
        0,
        0,
        1,
        levels.len() as u32,
        0,
    ];
    for w in words {
        out.extend_from_slice(&w.to_le_bytes());
    }
    for (i, level) in levels.iter().enumerate() {
        out.extend_from_slice(&(level.len() as u32).to_le_bytes());
        out.extend_from_slice(level);
        if i + 1 < levels.len() {
            out.extend_from_slice(&[0u8; 4][..3 - ((level.len() + 3) % 4)]);
        }
    }
    out
}

#[cfg(feature = "ktx")]
#[test]
fn ktx_etc1_loads_and_decodes() {
    let file = build_ktx(0x8D64, 4, 4, &[&ETC1_RED]);
    let tex = zentex::ktx::decode(&file, &Limits::default()).unwrap();
    assert_eq!(tex.format(), Format::Compressed(TextureFormat::Etc1));
    let decoded = tex.decode(PixelFormat::RGBA8).unwrap();
    assert!(decoded.all_blocks_ok);
    for px in decoded.pixels.chunks_exact(4) {
        assert_eq!(px, &[255, 2, 2, 255]);
    }
}

#[cfg(feature = "ktx")]
#[test]
fn ktx_uncompressed_rgba8_loads() {
    let pixels: Vec<u8> = (0..2 * 2 * 4).map(|i| i as u8).collect();
    let file = build_ktx(0x8058, 2, 2, &[&pixels]);
    let tex = zentex::ktx::decode(&file, &Limits::default()).unwrap();
    assert_eq!(tex.format(), Format::Pixels(PixelFormat::RGBA8));
    let decoded = tex.decode(PixelFormat::RGBA8).unwrap();
    assert_eq!(decoded.pixels, pixels);
}

#[cfg(feature = "ktx")]
#[test]
fn ktx_mip_chain_respects_level_cap() {
    let level0 = [0u8; 32]; // 8x8 BC1
    let level1 = [0u8; 8];
    let file = build_ktx(0x83F0, 8, 8, &[&level0, &level1]);
    let textures = zentex::ktx::decode_mipmaps(&file, 1, &Limits::default()).unwrap();
    assert_eq!(textures.len(), 1);
    assert_eq!(textures[0].width(), 8);
}

#[cfg(feature = "dds")]
fn build_dds(four_cc: &[u8; 4], width: u32, height: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = b"DDS ".to_vec();
    let mut header = [0u8; 124];
    header[0..4].copy_from_slice(&124u32.to_le_bytes());
    header[8..12].copy_from_slice(&height.to_le_bytes());
    header[12..16].copy_from_slice(&width.to_le_bytes());
    header[76..80].copy_from_slice(&0x4u32.to_le_bytes());
    header[80..84].copy_from_slice(four_cc);
    out.extend_from_slice(&header);
    out.extend_from_slice(payload);
    out
}

#[cfg(feature = "dds")]
#[test]
fn dds_dxt1_loads_and_decodes() {
    // Solid green BC1 block: equal endpoints, indices 0.
    let mut block = [0u8; 8];
    block[0..2].copy_from_slice(&0x07E0u16.to_le_bytes());
    block[2..4].copy_from_slice(&0x07E0u16.to_le_bytes());
    let file = build_dds(b"DXT1", 4, 4, &block);
    let tex = zentex::dds::decode(&file, &Limits::default()).unwrap();
    assert_eq!(tex.format(), Format::Compressed(TextureFormat::Bc1));
    let decoded = tex.decode(PixelFormat::RGB8).unwrap();
    assert!(decoded.all_blocks_ok);
    for px in decoded.pixels.chunks_exact(3) {
        assert_eq!(px, &[0, 255, 0]);
    }
}

#[cfg(feature = "dds")]
#[test]
fn dds_rgtc2_loads_and_decodes() {
    let mut block = [0u8; 16];
    block[0] = 80;
    block[1] = 80;
    block[8] = 160;
    block[9] = 160;
    let file = build_dds(b"ATI2", 4, 4, &block);
    let tex = zentex::dds::decode(&file, &Limits::default()).unwrap();
    let decoded = tex.decode(PixelFormat::RG8).unwrap();
    for px in decoded.pixels.chunks_exact(2) {
        assert_eq!(px, &[80, 160]);
    }
}

#[cfg(feature = "dds")]
#[test]
fn dds_memory_limit_applies_per_level() {
    let file = build_dds(b"DXT1", 4, 4, &[0u8; 8]);
    let limits = Limits {
        max_memory_bytes: Some(4),
        ..Limits::default()
    };
    assert!(zentex::dds::decode(&file, &limits).is_err());
}

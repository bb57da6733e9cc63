#![no_main]
use libfuzzer_sys::fuzz_target;
use zentex::{Converter, DecodeFlags, ModeMask, TextureFormat, decompress_block};

const FORMATS: &[TextureFormat] = &[
    TextureFormat::Bc1,
    TextureFormat::Bc1a,
    TextureFormat::Bc2,
    TextureFormat::Bc3,
    TextureFormat::Rgtc1,
    TextureFormat::SignedRgtc1,
    TextureFormat::Rgtc2,
    TextureFormat::SignedRgtc2,
    TextureFormat::Etc1,
    TextureFormat::EacR11,
    TextureFormat::EacSignedR11,
    TextureFormat::EacRg11,
    TextureFormat::EacSignedRg11,
];

fuzz_target!(|data: &[u8]| {
    // Any 8/16 bytes must decode or fail cleanly, never panic.
    let mut out = [0u8; 64];
    let mut conv = Converter::new();
    for &format in FORMATS {
        if data.len() < format.block_size() {
            continue;
        }
        let _ = decompress_block(
            &data[..format.block_size()],
            format,
            ModeMask::ALL,
            DecodeFlags::NONE,
            &mut out,
            format.decoded_format(),
            &mut conv,
        );
    }
});

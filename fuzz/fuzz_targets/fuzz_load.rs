#![no_main]
use libfuzzer_sys::fuzz_target;
use zentex::{Limits, PixelFormat};

fuzz_target!(|data: &[u8]| {
    // Keep allocations bounded so the fuzzer exercises parsing, not OOM.
    let limits = Limits {
        max_width: Some(1 << 12),
        max_height: Some(1 << 12),
        max_memory_bytes: Some(1 << 24),
        ..Limits::default()
    };

    // Container parsing must never panic.
    if let Ok(tex) = zentex::ktx::decode(data, &limits) {
        let _ = tex.decode(PixelFormat::RGBA8);
    }
    if let Ok(tex) = zentex::dds::decode(data, &limits) {
        let _ = tex.decode(PixelFormat::RGBA8);
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|surface: retro_texture::Surface<&[u8]>| {
    let _result = surface.decode_rgba8();
});

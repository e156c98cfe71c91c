#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (
    retro_texture::SurfaceRgba8<&[u8]>,
    retro_texture::PixelFormat,
    retro_texture::Tiling
)| {
    let (surface, format, tiling) = input;
    let _result = surface.encode(format, tiling);
});

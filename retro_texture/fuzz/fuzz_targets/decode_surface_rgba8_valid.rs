#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::{Arbitrary, Result, Unstructured};
use retro_texture::{PixelFormat, Surface, Tiling};

#[derive(Debug)]
pub struct SurfaceInfo {
    width: u32,
    height: u32,
    format: PixelFormat,
    tiling: Tiling,
    data: Vec<u8>,
}

impl<'a> Arbitrary<'a> for SurfaceInfo {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let width = u.int_in_range(1..=256)?;
        let height = u.int_in_range(1..=256)?;
        let format = PixelFormat::arbitrary(u)?;
        let tiling = Tiling::arbitrary(u)?;

        // Enforce a valid input length ahead of time.
        // This avoids constantly failing the length check.
        let size = retro_texture::swizzle::surface_size_in_bytes(format, tiling, width, height)
            .unwrap_or_default();
        let mut data = vec![0u8; size];
        u.fill_buffer(&mut data)?;

        Ok(Self {
            width,
            height,
            format,
            tiling,
            data,
        })
    }
}

fuzz_target!(|input: SurfaceInfo| {
    let surface = Surface {
        width: input.width,
        height: input.height,
        image_format: input.format,
        tiling: input.tiling,
        data: &input.data[..],
    };

    let result = surface.decode_rgba8();
    if input.format.supports_tiling(input.tiling) {
        let rgba8 = result.unwrap();
        assert_eq!(
            input.width as usize * input.height as usize * 4,
            rgba8.data.len()
        );
    }
});

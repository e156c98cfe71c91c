use crate::{
    color::{to_color_format, ColorLayout},
    decode::PackedPixels,
    swizzle::padded_dimensions,
    PixelFormat, Surface, SurfaceError, SurfaceRgba8, Tiling,
};

impl<T: AsRef<[u8]>> SurfaceRgba8<T> {
    /// Encode an RGBA8 surface to the given `format` and `tiling`.
    /**
    ```rust
    use retro_texture::{PixelFormat, SurfaceRgba8, Tiling};

    let rgba8 = SurfaceRgba8 {
        width: 3,
        height: 3,
        data: vec![255u8; 3 * 3 * 4],
    };
    let surface = rgba8.encode(PixelFormat::Rgba4, Tiling::Ctr).unwrap();
    assert_eq!(8 * 8 * 2, surface.data.len());
    ```
    */
    pub fn encode(
        &self,
        format: PixelFormat,
        tiling: Tiling,
    ) -> Result<Surface<Vec<u8>>, SurfaceError> {
        encode_surface_rgba8(self, format, tiling)
    }
}

/// Encode `surface` to the given `format` and `tiling`.
///
/// Padding required by the tiling is filled with zeros.
/// ETC1, ETC1A4, and GX CMPR encoding is not supported.
/// DXT1 and DXT5 encoding requires the `encode` feature.
pub fn encode_surface_rgba8<T: AsRef<[u8]>>(
    surface: &SurfaceRgba8<T>,
    format: PixelFormat,
    tiling: Tiling,
) -> Result<Surface<Vec<u8>>, SurfaceError> {
    surface.validate()?;

    if !format.supports_tiling(tiling) {
        return Err(SurfaceError::UnsupportedTiling { format, tiling });
    }

    let (padded_width, padded_height) =
        padded_dimensions(format, tiling, surface.width, surface.height).ok_or(
            SurfaceError::PixelCountWouldOverflow {
                width: surface.width,
                height: surface.height,
            },
        )?;

    log::debug!(
        "encoding {}x{} surface to {:?} {:?}",
        surface.width,
        surface.height,
        format,
        tiling
    );

    let data = match (format, tiling) {
        (PixelFormat::Dxt1 | PixelFormat::Dxt5, Tiling::Linear) => encode_bcn(
            surface,
            format,
            tiling,
            padded_width as usize,
            padded_height as usize,
        )?,
        (PixelFormat::Etc1 | PixelFormat::Etc1A4 | PixelFormat::Dxt1 | PixelFormat::Dxt5, _) => {
            return Err(SurfaceError::UnsupportedEncodeFormat { format, tiling })
        }
        _ => encode_pixels(
            surface,
            format,
            tiling,
            padded_width as usize,
            padded_height as usize,
        )?,
    };

    Ok(Surface {
        width: surface.width,
        height: surface.height,
        image_format: format,
        tiling,
        data,
    })
}

fn encode_pixels<T: AsRef<[u8]>>(
    surface: &SurfaceRgba8<T>,
    format: PixelFormat,
    tiling: Tiling,
    padded_width: usize,
    padded_height: usize,
) -> Result<Vec<u8>, SurfaceError> {
    let layout =
        ColorLayout::from_format(format, tiling).ok_or(SurfaceError::UnsupportedEncodeFormat {
            format,
            tiling,
        })?;
    let pixels = PackedPixels::new(format, tiling, padded_width);

    let mut data = vec![0u8; pixels.size_in_bytes(padded_height)];

    let width = surface.width as usize;
    let rgba = surface.data.as_ref();
    for y in 0..surface.height as usize {
        for x in 0..width {
            let i = (y * width + x) * 4;
            let [r, g, b, a] = [rgba[i], rgba[i + 1], rgba[i + 2], rgba[i + 3]];
            let value = to_color_format(a, r, g, b, &layout);

            let index = pixels.index(x, y);
            pixels
                .write(&mut data, index, value)
                .ok_or(SurfaceError::NotEnoughData {
                    expected: pixels.size_in_bytes(padded_height),
                    actual: data.len(),
                })?;
        }
    }

    Ok(data)
}

#[cfg(feature = "encode")]
fn encode_bcn<T: AsRef<[u8]>>(
    surface: &SurfaceRgba8<T>,
    format: PixelFormat,
    tiling: Tiling,
    padded_width: usize,
    padded_height: usize,
) -> Result<Vec<u8>, SurfaceError> {
    let padded = pad_rgba8(
        surface.width as usize,
        surface.height as usize,
        padded_width,
        padded_height,
        surface.data.as_ref(),
    );

    // RGBA with 4 bytes per pixel.
    let rgba_surface = intel_tex_2::RgbaSurface {
        width: padded_width as u32,
        height: padded_height as u32,
        stride: padded_width as u32 * 4,
        data: &padded,
    };

    match format {
        PixelFormat::Dxt1 => Ok(intel_tex_2::bc1::compress_blocks(&rgba_surface)),
        PixelFormat::Dxt5 => Ok(intel_tex_2::bc3::compress_blocks(&rgba_surface)),
        _ => Err(SurfaceError::UnsupportedEncodeFormat { format, tiling }),
    }
}

#[cfg(not(feature = "encode"))]
fn encode_bcn<T: AsRef<[u8]>>(
    _surface: &SurfaceRgba8<T>,
    format: PixelFormat,
    tiling: Tiling,
    _padded_width: usize,
    _padded_height: usize,
) -> Result<Vec<u8>, SurfaceError> {
    Err(SurfaceError::UnsupportedEncodeFormat { format, tiling })
}

// Copy the pixels into a larger surface with zeros for the padding.
#[cfg(feature = "encode")]
fn pad_rgba8(
    width: usize,
    height: usize,
    padded_width: usize,
    padded_height: usize,
    data: &[u8],
) -> Vec<u8> {
    let mut padded = vec![0u8; padded_width * padded_height * 4];
    for y in 0..height {
        let input = y * width * 4;
        let output = y * padded_width * 4;
        padded[output..output + width * 4].copy_from_slice(&data[input..input + width * 4]);
    }
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(format: PixelFormat, tiling: Tiling, width: u32, height: u32, rgba: &[u8]) {
        let encoded = SurfaceRgba8 {
            width,
            height,
            data: rgba,
        }
        .encode(format, tiling)
        .unwrap();
        let decoded = encoded.decode_rgba8().unwrap();
        assert_eq!(rgba, &decoded.data[..], "{format:?} {tiling:?}");
    }

    // Pixels with values representable in every format.
    fn test_pixels(width: u32, height: u32, f: impl Fn(u8) -> [u8; 4]) -> Vec<u8> {
        (0..width * height)
            .flat_map(|i| f(if i % 2 == 0 { 0 } else { 255 }))
            .collect()
    }

    #[test]
    fn encode_decode_ctr_all_formats() {
        let gray = test_pixels(10, 6, |v| [v, v, v, 255]);
        let gray_alpha = test_pixels(10, 6, |v| [v, v, v, 255 - v]);
        let alpha = test_pixels(10, 6, |v| [255, 255, 255, v]);
        let color = test_pixels(10, 6, |v| [v, 255 - v, v, 255]);
        let color_alpha = test_pixels(10, 6, |v| [v, 255 - v, v, 255 - v]);
        let hilo = test_pixels(10, 6, |v| [v, 255 - v, 255, 255]);

        for tiling in [Tiling::Linear, Tiling::Ctr] {
            round_trip(PixelFormat::L8, tiling, 10, 6, &gray);
            round_trip(PixelFormat::L4, tiling, 10, 6, &gray);
            round_trip(PixelFormat::A8, tiling, 10, 6, &alpha);
            round_trip(PixelFormat::A4, tiling, 10, 6, &alpha);
            round_trip(PixelFormat::La4, tiling, 10, 6, &gray_alpha);
            round_trip(PixelFormat::La8, tiling, 10, 6, &gray_alpha);
            round_trip(PixelFormat::Hilo8, tiling, 10, 6, &hilo);
            round_trip(PixelFormat::Rgb565, tiling, 10, 6, &color);
            round_trip(PixelFormat::Rgb8, tiling, 10, 6, &color);
            round_trip(PixelFormat::Rgba5551, tiling, 10, 6, &color_alpha);
            round_trip(PixelFormat::Rgba4, tiling, 10, 6, &color_alpha);
            round_trip(PixelFormat::Rgba8, tiling, 10, 6, &color_alpha);
        }
    }

    #[test]
    fn encode_decode_gx_formats() {
        let gray = test_pixels(10, 6, |v| [v, v, v, 255]);
        let gray_alpha = test_pixels(10, 6, |v| [v, v, v, 255 - v]);
        let color = test_pixels(10, 6, |v| [v, 255 - v, v, 255]);
        let color_alpha = test_pixels(10, 6, |v| [v, 255 - v, v, 255 - v]);

        round_trip(PixelFormat::L4, Tiling::Gx, 10, 6, &gray);
        round_trip(PixelFormat::L8, Tiling::Gx, 10, 6, &gray);
        round_trip(PixelFormat::La4, Tiling::Gx, 10, 6, &gray_alpha);
        round_trip(PixelFormat::La8, Tiling::Gx, 10, 6, &gray_alpha);
        round_trip(PixelFormat::Rgb565, Tiling::Gx, 10, 6, &color);
        round_trip(PixelFormat::Rgba8, Tiling::Gx, 10, 6, &color_alpha);
    }

    #[test]
    fn encode_gx_rgba8_planes() {
        let surface = SurfaceRgba8 {
            width: 1,
            height: 1,
            data: &[1u8, 2, 3, 4],
        }
        .encode(PixelFormat::Rgba8, Tiling::Gx)
        .unwrap();

        let mut expected = vec![0u8; 64];
        expected[0..2].copy_from_slice(&[4, 1]);
        expected[32..34].copy_from_slice(&[2, 3]);
        assert_eq!(expected, surface.data);
    }

    #[test]
    fn encode_ctr_padding_zeros() {
        let surface = SurfaceRgba8 {
            width: 1,
            height: 1,
            data: &[255u8; 4],
        }
        .encode(PixelFormat::L8, Tiling::Ctr)
        .unwrap();

        let mut expected = vec![0u8; 64];
        expected[0] = 255;
        assert_eq!(expected, surface.data);
    }

    #[test]
    fn encode_etc1_unsupported() {
        let result = SurfaceRgba8 {
            width: 4,
            height: 4,
            data: &[0u8; 4 * 4 * 4],
        }
        .encode(PixelFormat::Etc1, Tiling::Ctr);

        assert_eq!(
            Err(SurfaceError::UnsupportedEncodeFormat {
                format: PixelFormat::Etc1,
                tiling: Tiling::Ctr
            }),
            result
        );
    }

    #[test]
    fn encode_cmpr_unsupported() {
        let result = SurfaceRgba8 {
            width: 8,
            height: 8,
            data: &[0u8; 8 * 8 * 4],
        }
        .encode(PixelFormat::Dxt1, Tiling::Gx);

        assert_eq!(
            Err(SurfaceError::UnsupportedEncodeFormat {
                format: PixelFormat::Dxt1,
                tiling: Tiling::Gx
            }),
            result
        );
    }

    #[test]
    fn encode_unsupported_tiling() {
        let result = SurfaceRgba8 {
            width: 4,
            height: 4,
            data: &[0u8; 4 * 4 * 4],
        }
        .encode(PixelFormat::Rgba4, Tiling::Gx);

        assert_eq!(
            Err(SurfaceError::UnsupportedTiling {
                format: PixelFormat::Rgba4,
                tiling: Tiling::Gx
            }),
            result
        );
    }

    #[test]
    fn encode_surface_zero_size() {
        let result = SurfaceRgba8 {
            width: 0,
            height: 0,
            data: &[0u8; 0],
        }
        .encode(PixelFormat::Rgba8, Tiling::Linear);

        assert_eq!(
            Err(SurfaceError::ZeroSizedSurface {
                width: 0,
                height: 0
            }),
            result
        );
    }

    #[cfg(feature = "encode")]
    #[test]
    fn encode_dxt1_padded() {
        let rgba = [255u8, 0, 0, 255].repeat(5 * 5);
        let surface = SurfaceRgba8 {
            width: 5,
            height: 5,
            data: &rgba,
        }
        .encode(PixelFormat::Dxt1, Tiling::Linear)
        .unwrap();

        // 5x5 is padded to 8x8.
        assert_eq!(4 * 8, surface.data.len());

        let decoded = surface.decode_rgba8().unwrap();
        assert_eq!(5 * 5 * 4, decoded.data.len());
    }

    #[cfg(feature = "encode")]
    #[test]
    fn encode_dxt5_size() {
        let surface = SurfaceRgba8 {
            width: 4,
            height: 4,
            data: &[128u8; 4 * 4 * 4],
        }
        .encode(PixelFormat::Dxt5, Tiling::Linear)
        .unwrap();

        assert_eq!(16, surface.data.len());
    }

    #[cfg(feature = "encode")]
    #[test]
    fn pad_rgba8_1x1_to_2x2() {
        assert_eq!(
            vec![1, 2, 3, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            pad_rgba8(1, 1, 2, 2, &[1, 2, 3, 4])
        );
    }
}

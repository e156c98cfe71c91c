use crate::{swizzle::surface_size_in_bytes, PixelFormat, SurfaceError, Tiling};

/// A 2D surface with a pixel format and tiling known at runtime.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Surface<T> {
    /// The width of the surface in pixels without any padding.
    pub width: u32,
    /// The height of the surface in pixels without any padding.
    pub height: u32,
    /// The format of the bytes in [data](#structfield.data).
    pub image_format: PixelFormat,
    /// The arrangement of pixels or blocks in [data](#structfield.data).
    pub tiling: Tiling,
    /// The image data including any padding required by the tiling.
    /// Additional bytes after the image data are ignored.
    pub data: T,
}

impl<T: AsRef<[u8]>> Surface<T> {
    /// The number of bytes used by the image including padding.
    pub fn size_in_bytes(&self) -> Option<usize> {
        surface_size_in_bytes(self.image_format, self.tiling, self.width, self.height)
    }

    pub(crate) fn validate(&self) -> Result<(), SurfaceError> {
        if self.width == 0 || self.height == 0 {
            return Err(SurfaceError::ZeroSizedSurface {
                width: self.width,
                height: self.height,
            });
        }

        if !self.image_format.supports_tiling(self.tiling) {
            return Err(SurfaceError::UnsupportedTiling {
                format: self.image_format,
                tiling: self.tiling,
            });
        }

        rgba8_size_in_bytes(self.width, self.height)?;

        let expected = self
            .size_in_bytes()
            .ok_or(SurfaceError::PixelCountWouldOverflow {
                width: self.width,
                height: self.height,
            })?;

        let actual = self.data.as_ref().len();
        if expected > actual {
            return Err(SurfaceError::NotEnoughData { expected, actual });
        }

        Ok(())
    }
}

/// An uncompressed RGBA8 surface with 4 bytes per pixel in row-major order.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceRgba8<T> {
    /// The width of the surface in pixels.
    pub width: u32,
    /// The height of the surface in pixels.
    pub height: u32,
    /// The RGBA8 pixels without any padding.
    pub data: T,
}

impl<T: AsRef<[u8]>> SurfaceRgba8<T> {
    pub(crate) fn validate(&self) -> Result<(), SurfaceError> {
        if self.width == 0 || self.height == 0 {
            return Err(SurfaceError::ZeroSizedSurface {
                width: self.width,
                height: self.height,
            });
        }

        let expected = rgba8_size_in_bytes(self.width, self.height)?;
        let actual = self.data.as_ref().len();
        if expected > actual {
            return Err(SurfaceError::NotEnoughData { expected, actual });
        }

        Ok(())
    }
}

pub(crate) fn rgba8_size_in_bytes(width: u32, height: u32) -> Result<usize, SurfaceError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|p| p.checked_mul(4))
        .ok_or(SurfaceError::PixelCountWouldOverflow { width, height })
}

#[cfg(feature = "image")]
impl<T: AsRef<[u8]>> Surface<T> {
    /// Decode the surface to an RGBA8 image.
    pub fn to_image(&self) -> Result<image::RgbaImage, crate::CreateImageError> {
        self.decode_rgba8()?.into_image()
    }
}

#[cfg(feature = "image")]
impl<'a> SurfaceRgba8<&'a [u8]> {
    /// Create a borrowed surface from the pixels in `image`.
    pub fn from_image(image: &'a image::RgbaImage) -> Self {
        SurfaceRgba8 {
            width: image.width(),
            height: image.height(),
            data: image.as_raw(),
        }
    }
}

#[cfg(feature = "image")]
impl<T: AsRef<[u8]>> SurfaceRgba8<T> {
    /// Copy the pixels to a new image.
    pub fn to_image(&self) -> Result<image::RgbaImage, crate::CreateImageError> {
        image_from_rgba8(self.width, self.height, self.data.as_ref().to_vec())
    }
}

#[cfg(feature = "image")]
impl SurfaceRgba8<Vec<u8>> {
    /// Convert to an image without copying the pixels.
    pub fn into_image(self) -> Result<image::RgbaImage, crate::CreateImageError> {
        image_from_rgba8(self.width, self.height, self.data)
    }
}

#[cfg(feature = "image")]
fn image_from_rgba8(
    width: u32,
    height: u32,
    data: Vec<u8>,
) -> Result<image::RgbaImage, crate::CreateImageError> {
    let data_length = data.len();
    image::RgbaImage::from_raw(width, height, data).ok_or(
        crate::CreateImageError::InvalidSurfaceDimensions {
            width,
            height,
            data_length,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_zero_size() {
        let result = Surface {
            width: 0,
            height: 4,
            image_format: PixelFormat::Rgba8,
            tiling: Tiling::Linear,
            data: &[0u8; 0],
        }
        .validate();

        assert_eq!(
            Err(SurfaceError::ZeroSizedSurface {
                width: 0,
                height: 4
            }),
            result
        );
    }

    #[test]
    fn validate_unsupported_tiling() {
        let result = Surface {
            width: 4,
            height: 4,
            image_format: PixelFormat::Dxt5,
            tiling: Tiling::Ctr,
            data: &[0u8; 64],
        }
        .validate();

        assert_eq!(
            Err(SurfaceError::UnsupportedTiling {
                format: PixelFormat::Dxt5,
                tiling: Tiling::Ctr
            }),
            result
        );
    }

    #[test]
    fn validate_padded_size() {
        // 3DS surfaces are padded to 8x8.
        let result = Surface {
            width: 4,
            height: 4,
            image_format: PixelFormat::Rgba8,
            tiling: Tiling::Ctr,
            data: &[0u8; 4 * 4 * 4],
        }
        .validate();

        assert_eq!(
            Err(SurfaceError::NotEnoughData {
                expected: 8 * 8 * 4,
                actual: 4 * 4 * 4
            }),
            result
        );
    }

    #[test]
    fn validate_extra_data() {
        let result = Surface {
            width: 4,
            height: 4,
            image_format: PixelFormat::Dxt1,
            tiling: Tiling::Linear,
            data: &[0u8; 16],
        }
        .validate();

        assert_eq!(Ok(()), result);
    }

    #[test]
    fn validate_overflow() {
        let result = Surface {
            width: u32::MAX,
            height: u32::MAX,
            image_format: PixelFormat::Rgba8,
            tiling: Tiling::Ctr,
            data: &[0u8; 0],
        }
        .validate();

        assert_eq!(
            Err(SurfaceError::PixelCountWouldOverflow {
                width: u32::MAX,
                height: u32::MAX
            }),
            result
        );
    }

    #[test]
    fn validate_rgba8_not_enough_data() {
        let result = SurfaceRgba8 {
            width: 2,
            height: 2,
            data: &[0u8; 15],
        }
        .validate();

        assert_eq!(
            Err(SurfaceError::NotEnoughData {
                expected: 16,
                actual: 15
            }),
            result
        );
    }
}

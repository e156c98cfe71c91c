//! # retro_texture
//! retro_texture decodes the texture data found in 3DS, GameCube, Wii, and PC game files to RGBA8
//! and encodes RGBA8 data back to those formats.
//!
//! A [Surface] describes the bytes of a single image along with its [PixelFormat] and [Tiling].
//! The surface dimensions are the physical dimensions of the image.
//! Any padding required by the tiling is handled internally,
//! so pixels outside the image are never written to the output.
//!
//! Parsing the container that stores the texture (BCLIM, TPL, DDS, etc) is left to the caller.
/*!
```rust no_run
use retro_texture::{PixelFormat, Surface, Tiling};
# fn main() -> Result<(), retro_texture::SurfaceError> {
# let data = vec![0u8; 128 * 128 / 2];
// Decode ETC1 data from a 3DS BCLIM file.
let surface = Surface {
    width: 100,
    height: 128,
    image_format: PixelFormat::Etc1,
    tiling: Tiling::Ctr,
    data: &data,
};
let rgba8 = surface.decode_rgba8()?;
assert_eq!(100 * 128 * 4, rgba8.data.len());
# Ok(())
# }
```
*/
//!
//! # Limitations
//! Surfaces are always 2D with a single mip level.
//! Not every [PixelFormat] can be used with every [Tiling].
//! See [PixelFormat::supports_tiling] for the valid combinations.
pub mod color;
pub mod swizzle;

mod decode;
mod encode;
mod error;
mod surface;

#[cfg(feature = "ddsfile")]
mod dds;

pub use decode::decode_surface_rgba8;
pub use encode::encode_surface_rgba8;
pub use error::*;
pub use surface::*;

#[cfg(feature = "ddsfile")]
pub use dds::*;

#[cfg(feature = "ddsfile")]
pub use ddsfile;

#[cfg(feature = "image")]
pub use image;

/// Supported pixel formats.
///
/// The discriminants match the 3DS format ids used by BCLIM and similar files.
/// DXT1 and DXT5 are appended after the 3DS formats.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "strum",
    derive(strum::EnumString, strum::Display, strum::EnumIter)
)]
#[cfg_attr(feature = "strum", strum(ascii_case_insensitive))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PixelFormat {
    /// 8-bit luminance
    L8 = 0,
    /// 8-bit alpha with white color
    A8 = 1,
    /// 4-bit luminance and 4-bit alpha
    La4 = 2,
    /// 8-bit luminance and 8-bit alpha
    La8 = 3,
    /// 8-bit red and green often used for normal maps
    Hilo8 = 4,
    Rgb565 = 5,
    Rgb8 = 6,
    Rgba5551 = 7,
    Rgba4 = 8,
    Rgba8 = 9,
    /// 4x4 ETC1 blocks of 8 bytes
    Etc1 = 10,
    /// 4x4 ETC1 blocks with an additional 8 bytes of 4-bit alpha
    Etc1A4 = 11,
    /// 4-bit luminance with two pixels per byte
    L4 = 12,
    /// 4-bit alpha with two pixels per byte
    A4 = 13,
    /// 4x4 BC1 blocks of 8 bytes
    Dxt1 = 14,
    /// 4x4 BC3 blocks of 16 bytes
    Dxt5 = 15,
}

impl PixelFormat {
    /// The number of bits for each pixel including block compressed formats.
    pub fn bits_per_pixel(&self) -> usize {
        match self {
            PixelFormat::L8 => 8,
            PixelFormat::A8 => 8,
            PixelFormat::La4 => 8,
            PixelFormat::La8 => 16,
            PixelFormat::Hilo8 => 16,
            PixelFormat::Rgb565 => 16,
            PixelFormat::Rgb8 => 24,
            PixelFormat::Rgba5551 => 16,
            PixelFormat::Rgba4 => 16,
            PixelFormat::Rgba8 => 32,
            PixelFormat::Etc1 => 4,
            PixelFormat::Etc1A4 => 8,
            PixelFormat::L4 => 4,
            PixelFormat::A4 => 4,
            PixelFormat::Dxt1 => 4,
            PixelFormat::Dxt5 => 8,
        }
    }

    /// Returns `true` if the format stores 4x4 pixel blocks instead of individual pixels.
    pub fn is_block_compressed(&self) -> bool {
        matches!(
            self,
            PixelFormat::Etc1 | PixelFormat::Etc1A4 | PixelFormat::Dxt1 | PixelFormat::Dxt5
        )
    }

    /// Returns `true` if data in this format can be stored using `tiling`.
    /**
    ```rust
    use retro_texture::{PixelFormat, Tiling};

    assert!(PixelFormat::Etc1.supports_tiling(Tiling::Ctr));
    assert!(PixelFormat::Dxt1.supports_tiling(Tiling::Gx));
    assert!(!PixelFormat::Dxt5.supports_tiling(Tiling::Ctr));
    ```
    */
    pub fn supports_tiling(&self, tiling: Tiling) -> bool {
        match tiling {
            Tiling::Linear => true,
            Tiling::Ctr => !matches!(self, PixelFormat::Dxt1 | PixelFormat::Dxt5),
            Tiling::Gx => matches!(
                self,
                PixelFormat::L4
                    | PixelFormat::L8
                    | PixelFormat::La4
                    | PixelFormat::La8
                    | PixelFormat::Rgb565
                    | PixelFormat::Rgba8
                    | PixelFormat::Dxt1
            ),
        }
    }
}

impl TryFrom<u32> for PixelFormat {
    type Error = SurfaceError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PixelFormat::L8),
            1 => Ok(PixelFormat::A8),
            2 => Ok(PixelFormat::La4),
            3 => Ok(PixelFormat::La8),
            4 => Ok(PixelFormat::Hilo8),
            5 => Ok(PixelFormat::Rgb565),
            6 => Ok(PixelFormat::Rgb8),
            7 => Ok(PixelFormat::Rgba5551),
            8 => Ok(PixelFormat::Rgba4),
            9 => Ok(PixelFormat::Rgba8),
            10 => Ok(PixelFormat::Etc1),
            11 => Ok(PixelFormat::Etc1A4),
            12 => Ok(PixelFormat::L4),
            13 => Ok(PixelFormat::A4),
            14 => Ok(PixelFormat::Dxt1),
            15 => Ok(PixelFormat::Dxt5),
            _ => Err(SurfaceError::UnsupportedFormat { value }),
        }
    }
}

/// The arrangement of pixels or blocks in memory.
///
/// The tiling is chosen by the caller based on the file format and is never detected automatically.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "strum",
    derive(strum::EnumString, strum::Display, strum::EnumIter)
)]
#[cfg_attr(feature = "strum", strum(ascii_case_insensitive))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Tiling {
    /// Pixels or 4x4 blocks in row-major order like DDS.
    /// RGB8 and RGBA8 channels are in memory order.
    /// ETC1 color words are big-endian like PKM.
    Linear,
    /// 3DS GPU tiling with 8x8 pixel tiles in Z-order.
    /// Dimensions are padded to powers of two.
    Ctr,
    /// GameCube and Wii GX tiling with 32 byte blocks in row-major order.
    Gx,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_ids_round_trip() {
        for value in 0..16 {
            let format = PixelFormat::try_from(value).unwrap();
            assert_eq!(value, format as u32);
        }
    }

    #[test]
    fn format_id_unsupported() {
        assert_eq!(
            Err(SurfaceError::UnsupportedFormat { value: 16 }),
            PixelFormat::try_from(16)
        );
    }

    #[test]
    fn block_formats() {
        assert!(PixelFormat::Etc1.is_block_compressed());
        assert!(PixelFormat::Etc1A4.is_block_compressed());
        assert!(PixelFormat::Dxt1.is_block_compressed());
        assert!(PixelFormat::Dxt5.is_block_compressed());
        assert!(!PixelFormat::L4.is_block_compressed());
        assert!(!PixelFormat::Rgba8.is_block_compressed());
    }

    #[test]
    fn linear_supports_all_formats() {
        for value in 0..16 {
            let format = PixelFormat::try_from(value).unwrap();
            assert!(format.supports_tiling(Tiling::Linear));
        }
    }

    #[test]
    fn gx_unsupported_formats() {
        assert!(!PixelFormat::Etc1.supports_tiling(Tiling::Gx));
        assert!(!PixelFormat::Rgba5551.supports_tiling(Tiling::Gx));
        assert!(!PixelFormat::Dxt5.supports_tiling(Tiling::Gx));
    }
}

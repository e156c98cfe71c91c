use thiserror::Error;

use crate::{PixelFormat, Tiling};

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum SurfaceError {
    #[error("surface dimensions {width} x {height} contain no pixels")]
    ZeroSizedSurface { width: u32, height: u32 },

    #[error("surface pixel count {width} x {height} would overflow")]
    PixelCountWouldOverflow { width: u32, height: u32 },

    #[error("expected surface to have at least {expected} bytes but found {actual}")]
    NotEnoughData { expected: usize, actual: usize },

    #[error("expected output buffer to have at least {expected} bytes but found {actual}")]
    OutputTooSmall { expected: usize, actual: usize },

    #[error("pixel format id {value} is not supported")]
    UnsupportedFormat { value: u32 },

    #[error("format {format:?} is not supported with {tiling:?} tiling")]
    UnsupportedTiling { format: PixelFormat, tiling: Tiling },

    #[error("encoding data to format {format:?} with {tiling:?} tiling is not supported")]
    UnsupportedEncodeFormat { format: PixelFormat, tiling: Tiling },
}

#[cfg(feature = "image")]
#[derive(Debug, Error)]
pub enum CreateImageError {
    #[error("data length {data_length} is not valid for a {width}x{height} image")]
    InvalidSurfaceDimensions {
        width: u32,
        height: u32,
        data_length: usize,
    },

    #[error("error decoding surface: {0}")]
    DecodeSurface(#[from] SurfaceError),
}

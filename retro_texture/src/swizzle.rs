//! Functions for mapping pixel and block coordinates to their location in tiled memory.
//!
//! The 3DS GPU stores images in 8x8 pixel tiles in row-major order.
//! Pixels within a tile use a Z-order curve over 2x2 groups
//! and block compressed formats store four 4x4 blocks per tile.
//!
//! The GX GPU on the GameCube and Wii stores images in 32 byte blocks in row-major order.
//! The block dimensions depend on the bits per pixel.
//!
//! These functions don't perform any bounds checking.
//! Callers are expected to use the dimensions from [padded_dimensions].
use crate::{PixelFormat, Tiling};

/// The storage order of the 16 pixels in each 4x4 quadrant of an 8x8 3DS tile.
pub const TILE_ORDER: [usize; 16] = [0, 1, 4, 5, 2, 3, 6, 7, 8, 9, 12, 13, 10, 11, 14, 15];

const CTR_TILE_DIMENSION: usize = 8;
const CTR_TILE_PIXELS: usize = 64;

/// The position of pixel (`x`, `y`) within an 8x8 3DS tile from 0 to 63.
/**
```rust
use retro_texture::swizzle::ctr_tile_index;

assert_eq!(0, ctr_tile_index(0, 0));
assert_eq!(2, ctr_tile_index(0, 1));
assert_eq!(16, ctr_tile_index(4, 0));
assert_eq!(63, ctr_tile_index(7, 7));
```
 */
pub fn ctr_tile_index(x: usize, y: usize) -> usize {
    TILE_ORDER[x % 4 + (y % 4) * 4] + 16 * ((x % 8) / 4) + 32 * ((y % 8) / 4)
}

/// The index of pixel (`x`, `y`) in a 3DS tiled surface with `padded_width` pixels per row.
pub fn ctr_pixel_index(x: usize, y: usize, padded_width: usize) -> usize {
    let tiles_per_row = padded_width / CTR_TILE_DIMENSION;
    let tile = (y / CTR_TILE_DIMENSION) * tiles_per_row + x / CTR_TILE_DIMENSION;
    tile * CTR_TILE_PIXELS + ctr_tile_index(x, y)
}

/// The index of the 4x4 block at (`block_x`, `block_y`) in a surface of 8x8 tiles
/// with `padded_width` pixels per row.
///
/// Each tile stores the top left, top right, bottom left, and bottom right blocks in order.
/// This is shared by 3DS ETC1 and GX CMPR.
pub fn ctr_block_index(block_x: usize, block_y: usize, padded_width: usize) -> usize {
    let tiles_per_row = padded_width / CTR_TILE_DIMENSION;
    let tile = (block_y / 2) * tiles_per_row + block_x / 2;
    tile * 4 + (block_x % 2) + (block_y % 2) * 2
}

/// The pixel coordinates of the top left corner of the 4x4 block at `index`.
/// This is the inverse of [ctr_block_index].
pub fn ctr_block_position(index: usize, padded_width: usize) -> (usize, usize) {
    let tiles_per_row = padded_width / CTR_TILE_DIMENSION;
    let tile = index / 4;
    let sub_block = index % 4;
    let x = (tile % tiles_per_row) * CTR_TILE_DIMENSION + (sub_block % 2) * 4;
    let y = (tile / tiles_per_row) * CTR_TILE_DIMENSION + (sub_block / 2) * 4;
    (x, y)
}

/// The dimension rounded up to the next power of two with a minimum of 8.
/// Returns `None` if the result would overflow.
/**
```rust
use retro_texture::swizzle::ctr_padded_dimension;

assert_eq!(Some(8), ctr_padded_dimension(1));
assert_eq!(Some(128), ctr_padded_dimension(100));
assert_eq!(Some(256), ctr_padded_dimension(256));
```
 */
pub fn ctr_padded_dimension(dimension: u32) -> Option<u32> {
    dimension
        .checked_next_power_of_two()
        .map(|d| d.max(CTR_TILE_DIMENSION as u32))
}

/// The dimensions of a single 32 byte GX block.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct GxBlockLayout {
    pub block_width: usize,
    pub block_height: usize,
}

impl GxBlockLayout {
    /// GX RGBA8 uses 4x4 blocks of 64 bytes split into AR and GB halves.
    pub fn from_bits_per_pixel(bits_per_pixel: usize) -> Self {
        match bits_per_pixel {
            4 => Self {
                block_width: 8,
                block_height: 8,
            },
            8 => Self {
                block_width: 8,
                block_height: 4,
            },
            _ => Self {
                block_width: 4,
                block_height: 4,
            },
        }
    }

    /// The layout for pixel formats or CMPR macro blocks of four DXT1 blocks.
    pub fn from_format(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Dxt1 => Self {
                block_width: 8,
                block_height: 8,
            },
            _ => Self::from_bits_per_pixel(format.bits_per_pixel()),
        }
    }
}

/// The pixel index of (`x`, `y`) in a GX tiled surface with `width_in_blocks` blocks per row.
///
/// Block dimensions are powers of two, so the block coordinates and
/// the position within the block can be combined with shifts.
/**
```rust
use retro_texture::swizzle::{gx_pixel_address, GxBlockLayout};

let layout = GxBlockLayout::from_bits_per_pixel(8);
assert_eq!(0, gx_pixel_address(0, 0, 2, &layout));
assert_eq!(8, gx_pixel_address(0, 1, 2, &layout));
assert_eq!(32, gx_pixel_address(8, 0, 2, &layout));
assert_eq!(64, gx_pixel_address(0, 4, 2, &layout));
```
 */
pub fn gx_pixel_address(
    x: usize,
    y: usize,
    width_in_blocks: usize,
    layout: &GxBlockLayout,
) -> usize {
    let x_shift = log2(layout.block_width);
    let y_shift = log2(layout.block_height);

    let block_index = (y >> y_shift) * width_in_blocks + (x >> x_shift);
    (block_index << (x_shift + y_shift))
        | ((y & (layout.block_height - 1)) << x_shift)
        | (x & (layout.block_width - 1))
}

/// The pixel index of (`x`, `y`) in a row-major surface with `width` pixels per row.
pub fn linear_pixel_offset(x: usize, y: usize, width: usize) -> usize {
    y * width + x
}

fn log2(value: usize) -> u32 {
    usize::BITS - 1 - value.leading_zeros()
}

/// The dimensions in pixels including any padding required by `tiling`.
/// Returns `None` if the padded dimensions would overflow.
///
/// Only 3DS surfaces are padded to powers of two.
/// GX surfaces are padded to whole blocks.
/// Linear surfaces are padded to whole blocks for block compressed formats.
/**
```rust
use retro_texture::{swizzle::padded_dimensions, PixelFormat, Tiling};

assert_eq!(Some((128, 64)), padded_dimensions(PixelFormat::Etc1, Tiling::Ctr, 100, 50));
assert_eq!(Some((8, 4)), padded_dimensions(PixelFormat::L8, Tiling::Gx, 5, 3));
assert_eq!(Some((8, 8)), padded_dimensions(PixelFormat::Dxt1, Tiling::Gx, 5, 3));
assert_eq!(Some((8, 4)), padded_dimensions(PixelFormat::Dxt5, Tiling::Linear, 5, 3));
assert_eq!(Some((5, 3)), padded_dimensions(PixelFormat::Rgba8, Tiling::Linear, 5, 3));
```
 */
pub fn padded_dimensions(
    format: PixelFormat,
    tiling: Tiling,
    width: u32,
    height: u32,
) -> Option<(u32, u32)> {
    match tiling {
        Tiling::Ctr => Some((ctr_padded_dimension(width)?, ctr_padded_dimension(height)?)),
        Tiling::Gx => {
            let layout = GxBlockLayout::from_format(format);
            Some((
                round_up(width, layout.block_width as u32)?,
                round_up(height, layout.block_height as u32)?,
            ))
        }
        Tiling::Linear => {
            if format.is_block_compressed() {
                Some((round_up(width, 4)?, round_up(height, 4)?))
            } else {
                Some((width, height))
            }
        }
    }
}

/// The number of bytes required to store a `width` x `height` surface
/// including any padding required by `tiling`.
/// Returns `None` if the size would overflow.
pub fn surface_size_in_bytes(
    format: PixelFormat,
    tiling: Tiling,
    width: u32,
    height: u32,
) -> Option<usize> {
    let (padded_width, padded_height) = padded_dimensions(format, tiling, width, height)?;
    let bits = (padded_width as usize)
        .checked_mul(padded_height as usize)?
        .checked_mul(format.bits_per_pixel())?;
    Some(bits.div_ceil(8))
}

fn round_up(x: u32, n: u32) -> Option<u32> {
    x.checked_add(n - 1).map(|x| x / n * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_order_is_permutation() {
        let mut sorted = TILE_ORDER;
        sorted.sort();
        assert_eq!(core::array::from_fn::<usize, 16, _>(|i| i), sorted);
    }

    #[test]
    fn ctr_tile_index_bijection() {
        let mut seen = [false; 64];
        for y in 0..8 {
            for x in 0..8 {
                let i = ctr_tile_index(x, y);
                assert!(!seen[i]);
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn ctr_tile_index_quadrants() {
        assert_eq!(0, ctr_tile_index(0, 0));
        assert_eq!(1, ctr_tile_index(1, 0));
        assert_eq!(4, ctr_tile_index(2, 0));
        assert_eq!(2, ctr_tile_index(0, 1));
        assert_eq!(16, ctr_tile_index(4, 0));
        assert_eq!(32, ctr_tile_index(0, 4));
        assert_eq!(48, ctr_tile_index(4, 4));
    }

    #[test]
    fn ctr_pixel_index_second_tile() {
        assert_eq!(64, ctr_pixel_index(8, 0, 16));
        assert_eq!(128, ctr_pixel_index(0, 8, 16));
        assert_eq!(255, ctr_pixel_index(15, 15, 16));
    }

    #[test]
    fn ctr_block_index_order() {
        assert_eq!(0, ctr_block_index(0, 0, 16));
        assert_eq!(1, ctr_block_index(1, 0, 16));
        assert_eq!(2, ctr_block_index(0, 1, 16));
        assert_eq!(3, ctr_block_index(1, 1, 16));
        assert_eq!(4, ctr_block_index(2, 0, 16));
        assert_eq!(8, ctr_block_index(0, 2, 16));
    }

    #[test]
    fn ctr_block_position_inverse() {
        for index in 0..64 {
            let (x, y) = ctr_block_position(index, 32);
            assert_eq!(index, ctr_block_index(x / 4, y / 4, 32));
        }
    }

    #[test]
    fn ctr_padded_dimension_values() {
        assert_eq!(Some(8), ctr_padded_dimension(0));
        assert_eq!(Some(8), ctr_padded_dimension(8));
        assert_eq!(Some(16), ctr_padded_dimension(9));
        assert_eq!(Some(1024), ctr_padded_dimension(1000));
        assert_eq!(None, ctr_padded_dimension(u32::MAX));
    }

    fn gx_bijection(bits_per_pixel: usize, width: usize, height: usize) {
        let layout = GxBlockLayout::from_bits_per_pixel(bits_per_pixel);
        let width_in_blocks = width / layout.block_width;

        let mut seen = vec![false; width * height];
        for y in 0..height {
            for x in 0..width {
                let i = gx_pixel_address(x, y, width_in_blocks, &layout);
                assert!(!seen[i]);
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn gx_pixel_address_bijection_4bpp() {
        gx_bijection(4, 24, 16);
    }

    #[test]
    fn gx_pixel_address_bijection_8bpp() {
        gx_bijection(8, 16, 12);
    }

    #[test]
    fn gx_pixel_address_bijection_16bpp() {
        gx_bijection(16, 12, 8);
    }

    #[test]
    fn gx_pixel_address_bijection_32bpp() {
        gx_bijection(32, 8, 8);
    }

    #[test]
    fn gx_pixel_address_4x4() {
        let layout = GxBlockLayout::from_bits_per_pixel(16);
        assert_eq!(5, gx_pixel_address(1, 1, 2, &layout));
        assert_eq!(16, gx_pixel_address(4, 0, 2, &layout));
        assert_eq!(32, gx_pixel_address(0, 4, 2, &layout));
    }

    #[test]
    fn padded_dimensions_overflow() {
        assert_eq!(
            None,
            padded_dimensions(PixelFormat::Rgba8, Tiling::Ctr, u32::MAX, 1)
        );
        assert_eq!(
            None,
            padded_dimensions(PixelFormat::Dxt1, Tiling::Linear, u32::MAX, 1)
        );
    }

    #[test]
    fn surface_size_ctr() {
        assert_eq!(
            Some(128 * 128 / 2),
            surface_size_in_bytes(PixelFormat::Etc1, Tiling::Ctr, 100, 128)
        );
        assert_eq!(
            Some(8 * 8 * 4),
            surface_size_in_bytes(PixelFormat::Rgba8, Tiling::Ctr, 3, 3)
        );
    }

    #[test]
    fn surface_size_gx() {
        assert_eq!(
            Some(32),
            surface_size_in_bytes(PixelFormat::Dxt1, Tiling::Gx, 1, 1)
        );
        assert_eq!(
            Some(64),
            surface_size_in_bytes(PixelFormat::Rgba8, Tiling::Gx, 4, 4)
        );
    }

    #[test]
    fn surface_size_linear() {
        assert_eq!(
            Some(2),
            surface_size_in_bytes(PixelFormat::L4, Tiling::Linear, 3, 1)
        );
        assert_eq!(
            Some(16),
            surface_size_in_bytes(PixelFormat::Dxt5, Tiling::Linear, 1, 1)
        );
    }
}

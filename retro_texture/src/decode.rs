use crate::{
    color::{unpack, ColorLayout},
    surface::rgba8_size_in_bytes,
    swizzle::{
        ctr_block_position, ctr_pixel_index, gx_pixel_address, linear_pixel_offset,
        padded_dimensions, GxBlockLayout,
    },
    PixelFormat, Surface, SurfaceError, SurfaceRgba8, Tiling,
};

const BLOCK_WIDTH: usize = 4;
const BLOCK_HEIGHT: usize = 4;
const CHANNELS: usize = 4;

type Block = [[[u8; CHANNELS]; BLOCK_WIDTH]; BLOCK_HEIGHT];

impl<T: AsRef<[u8]>> Surface<T> {
    /// Decode the surface to RGBA8 without any padding.
    pub fn decode_rgba8(&self) -> Result<SurfaceRgba8<Vec<u8>>, SurfaceError> {
        decode_surface_rgba8(self)
    }

    /// Decode the surface to RGBA8 into a caller provided buffer.
    ///
    /// The first `width * height * 4` bytes of `output` are written.
    pub fn decode_rgba8_into(&self, output: &mut [u8]) -> Result<(), SurfaceError> {
        self.validate()?;

        let expected = rgba8_size_in_bytes(self.width, self.height)?;
        if output.len() < expected {
            return Err(SurfaceError::OutputTooSmall {
                expected,
                actual: output.len(),
            });
        }

        decode(self, &mut output[..expected])
    }
}

/// Decode `surface` to RGBA8 without any padding.
/**
```rust
use retro_texture::{decode_surface_rgba8, PixelFormat, Surface, Tiling};

// A 2x1 GX RGB565 image is padded to a single 4x4 block.
let mut data = [0u8; 32];
data[0..2].copy_from_slice(&0xF800u16.to_be_bytes());
data[2..4].copy_from_slice(&0x001Fu16.to_be_bytes());

let rgba8 = decode_surface_rgba8(&Surface {
    width: 2,
    height: 1,
    image_format: PixelFormat::Rgb565,
    tiling: Tiling::Gx,
    data: &data,
})
.unwrap();
assert_eq!(vec![255, 0, 0, 255, 0, 0, 255, 255], rgba8.data);
```
 */
pub fn decode_surface_rgba8<T: AsRef<[u8]>>(
    surface: &Surface<T>,
) -> Result<SurfaceRgba8<Vec<u8>>, SurfaceError> {
    surface.validate()?;

    let mut data = vec![0u8; rgba8_size_in_bytes(surface.width, surface.height)?];
    decode(surface, &mut data)?;

    Ok(SurfaceRgba8 {
        width: surface.width,
        height: surface.height,
        data,
    })
}

fn decode<T: AsRef<[u8]>>(surface: &Surface<T>, rgba: &mut [u8]) -> Result<(), SurfaceError> {
    let (padded_width, padded_height) = padded_dimensions(
        surface.image_format,
        surface.tiling,
        surface.width,
        surface.height,
    )
    .ok_or(SurfaceError::PixelCountWouldOverflow {
        width: surface.width,
        height: surface.height,
    })?;

    log::debug!(
        "decoding {}x{} {:?} {:?} surface padded to {}x{}",
        surface.width,
        surface.height,
        surface.image_format,
        surface.tiling,
        padded_width,
        padded_height
    );

    let dimensions = Dimensions {
        width: surface.width as usize,
        height: surface.height as usize,
        padded_width: padded_width as usize,
        padded_height: padded_height as usize,
    };
    let data = surface.data.as_ref();
    let tiling = surface.tiling;

    use PixelFormat as F;
    match (surface.image_format, tiling) {
        (F::Etc1, Tiling::Linear) => decode_blocks::<Etc1Pkm>(dimensions, tiling, data, rgba),
        (F::Etc1, Tiling::Ctr) => decode_blocks::<Etc1>(dimensions, tiling, data, rgba),
        (F::Etc1A4, Tiling::Linear) => decode_blocks::<Etc1A4Pkm>(dimensions, tiling, data, rgba),
        (F::Etc1A4, Tiling::Ctr) => decode_blocks::<Etc1A4>(dimensions, tiling, data, rgba),
        (F::Dxt1, Tiling::Linear) => decode_blocks::<Dxt1>(dimensions, tiling, data, rgba),
        (F::Dxt1, Tiling::Gx) => decode_blocks::<Cmpr>(dimensions, tiling, data, rgba),
        (F::Dxt5, Tiling::Linear) => decode_blocks::<Dxt5>(dimensions, tiling, data, rgba),
        (format, tiling) => decode_pixels(format, tiling, dimensions, data, rgba),
    }
}

#[derive(Debug, Clone, Copy)]
struct Dimensions {
    width: usize,
    height: usize,
    padded_width: usize,
    padded_height: usize,
}

trait BlockDecode {
    type CompressedBlock: ReadBlock;

    // The decoded 4x4 pixel blocks are in row-major ordering.
    fn decompress_block(block: &Self::CompressedBlock) -> Block;
}

// Allows block types to read and copy buffer data to enforce alignment.
trait ReadBlock: Sized {
    const SIZE_IN_BYTES: usize;

    fn read_block(data: &[u8], offset: usize) -> Option<Self>;
}

impl ReadBlock for [u8; 8] {
    const SIZE_IN_BYTES: usize = 8;

    fn read_block(data: &[u8], offset: usize) -> Option<Self> {
        data.get(offset..offset + 8)?.try_into().ok()
    }
}

impl ReadBlock for [u8; 16] {
    const SIZE_IN_BYTES: usize = 16;

    fn read_block(data: &[u8], offset: usize) -> Option<Self> {
        data.get(offset..offset + 16)?.try_into().ok()
    }
}

/// ETC1 with little-endian color words used by the 3DS.
struct Etc1;
/// ETC1 with big-endian color words used by PKM files.
struct Etc1Pkm;
struct Etc1A4;
struct Etc1A4Pkm;
struct Dxt1;
struct Dxt5;
/// DXT1 with big-endian endpoints and reversed indices used by GX.
struct Cmpr;

fn decompress(f: impl FnOnce(&mut [u8], usize)) -> Block {
    let mut decompressed = [[[0u8; CHANNELS]; BLOCK_WIDTH]; BLOCK_HEIGHT];
    f(
        bytemuck::cast_slice_mut(&mut decompressed),
        BLOCK_WIDTH * CHANNELS,
    );
    decompressed
}

impl BlockDecode for Etc1 {
    type CompressedBlock = [u8; 8];

    fn decompress_block(block: &[u8; 8]) -> Block {
        decompress(|output, pitch| retro_blockdec::etc1(block, output, pitch))
    }
}

impl BlockDecode for Etc1Pkm {
    type CompressedBlock = [u8; 8];

    fn decompress_block(block: &[u8; 8]) -> Block {
        let mut block = *block;
        block.reverse();
        Etc1::decompress_block(&block)
    }
}

impl BlockDecode for Etc1A4 {
    type CompressedBlock = [u8; 16];

    fn decompress_block(block: &[u8; 16]) -> Block {
        decompress(|output, pitch| retro_blockdec::etc1a4(block, output, pitch))
    }
}

impl BlockDecode for Etc1A4Pkm {
    type CompressedBlock = [u8; 16];

    fn decompress_block(block: &[u8; 16]) -> Block {
        // Only the color half is big-endian.
        let mut block = *block;
        block[8..].reverse();
        Etc1A4::decompress_block(&block)
    }
}

impl BlockDecode for Dxt1 {
    type CompressedBlock = [u8; 8];

    fn decompress_block(block: &[u8; 8]) -> Block {
        decompress(|output, pitch| retro_blockdec::dxt1(block, output, pitch))
    }
}

impl BlockDecode for Dxt5 {
    type CompressedBlock = [u8; 16];

    fn decompress_block(block: &[u8; 16]) -> Block {
        decompress(|output, pitch| retro_blockdec::dxt5(block, output, pitch))
    }
}

impl BlockDecode for Cmpr {
    type CompressedBlock = [u8; 8];

    fn decompress_block(block: &[u8; 8]) -> Block {
        Dxt1::decompress_block(&retro_blockdec::cmpr_to_dxt1(block))
    }
}

fn decode_blocks<F: BlockDecode>(
    dimensions: Dimensions,
    tiling: Tiling,
    data: &[u8],
    rgba: &mut [u8],
) -> Result<(), SurfaceError> {
    let width_in_blocks = dimensions.padded_width / BLOCK_WIDTH;
    let block_count = width_in_blocks * (dimensions.padded_height / BLOCK_HEIGHT);
    let block_size = F::CompressedBlock::SIZE_IN_BYTES;

    // Blocks are visited in storage order.
    for index in 0..block_count {
        let (x, y) = match tiling {
            Tiling::Linear => (
                (index % width_in_blocks) * BLOCK_WIDTH,
                (index / width_in_blocks) * BLOCK_HEIGHT,
            ),
            Tiling::Ctr | Tiling::Gx => ctr_block_position(index, dimensions.padded_width),
        };

        // Skip reading and decoding blocks that only contain padding.
        if x >= dimensions.width || y >= dimensions.height {
            continue;
        }

        let offset = index * block_size;
        let block = F::CompressedBlock::read_block(data, offset).ok_or(
            SurfaceError::NotEnoughData {
                expected: offset + block_size,
                actual: data.len(),
            },
        )?;
        let decompressed_block = F::decompress_block(&block);

        put_rgba_block(
            rgba,
            decompressed_block,
            x,
            y,
            dimensions.width,
            dimensions.height,
        );
    }

    Ok(())
}

/// Copy the rows of `pixels` that land inside the `width` x `height` output
/// with the top left corner at (`x`, `y`).
fn put_rgba_block(
    surface: &mut [u8],
    pixels: Block,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) {
    if x >= width || y >= height {
        return;
    }

    let columns = BLOCK_WIDTH.min(width - x);
    let rows = BLOCK_HEIGHT.min(height - y);
    let row_size = columns * CHANNELS;

    for (row, row_pixels) in pixels.iter().enumerate().take(rows) {
        let start = ((y + row) * width + x) * CHANNELS;
        let source: &[u8] = bytemuck::cast_slice(row_pixels);
        surface[start..start + row_size].copy_from_slice(&source[..row_size]);
    }
}

fn decode_pixels(
    format: PixelFormat,
    tiling: Tiling,
    dimensions: Dimensions,
    data: &[u8],
    rgba: &mut [u8],
) -> Result<(), SurfaceError> {
    let layout =
        ColorLayout::from_format(format, tiling).ok_or(SurfaceError::UnsupportedTiling {
            format,
            tiling,
        })?;
    let pixels = PackedPixels::new(format, tiling, dimensions.padded_width);

    for y in 0..dimensions.height {
        for x in 0..dimensions.width {
            let index = pixels.index(x, y);
            let value = pixels.read(data, index).ok_or(SurfaceError::NotEnoughData {
                expected: pixels.size_in_bytes(dimensions.padded_height),
                actual: data.len(),
            })?;

            let output_index = (y * dimensions.width + x) * CHANNELS;
            rgba[output_index..output_index + CHANNELS].copy_from_slice(&unpack(value, &layout));
        }
    }

    Ok(())
}

/// Reads and writes individual packed pixels in tiled memory.
pub(crate) struct PackedPixels {
    bits_per_pixel: usize,
    tiling: Tiling,
    padded_width: usize,
    gx_layout: GxBlockLayout,
    /// GX RGBA8 stores AR and GB values in separate halves of each block.
    split_planes: bool,
}

impl PackedPixels {
    pub(crate) fn new(format: PixelFormat, tiling: Tiling, padded_width: usize) -> Self {
        Self {
            bits_per_pixel: format.bits_per_pixel(),
            tiling,
            padded_width,
            gx_layout: GxBlockLayout::from_format(format),
            split_planes: tiling == Tiling::Gx && format == PixelFormat::Rgba8,
        }
    }

    /// The storage index of pixel (`x`, `y`).
    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        match self.tiling {
            Tiling::Linear => linear_pixel_offset(x, y, self.padded_width),
            Tiling::Ctr => ctr_pixel_index(x, y, self.padded_width),
            Tiling::Gx => gx_pixel_address(
                x,
                y,
                self.padded_width / self.gx_layout.block_width,
                &self.gx_layout,
            ),
        }
    }

    pub(crate) fn size_in_bytes(&self, padded_height: usize) -> usize {
        (self.padded_width * padded_height * self.bits_per_pixel).div_ceil(8)
    }

    fn big_endian(&self) -> bool {
        self.tiling == Tiling::Gx
    }

    // The nibble for even pixel indices.
    fn high_nibble_first(&self) -> bool {
        self.tiling == Tiling::Gx
    }

    fn nibble_shift(&self, index: usize) -> u32 {
        if (index % 2 == 0) == self.high_nibble_first() {
            4
        } else {
            0
        }
    }

    fn split_plane_offsets(index: usize) -> (usize, usize) {
        let ar = (index >> 4) * 64 + (index & 15) * 2;
        (ar, ar + 32)
    }

    /// The pixel value at storage `index` or `None` if the data is too short.
    pub(crate) fn read(&self, data: &[u8], index: usize) -> Option<u32> {
        if self.split_planes {
            let (ar, gb) = Self::split_plane_offsets(index);
            let ar = data.get(ar..ar + 2)?;
            let gb = data.get(gb..gb + 2)?;
            return Some(u32::from_be_bytes([ar[0], ar[1], gb[0], gb[1]]));
        }

        match self.bits_per_pixel {
            4 => {
                let byte = *data.get(index / 2)?;
                Some(((byte >> self.nibble_shift(index)) & 0xF) as u32)
            }
            bits => {
                let size = bits / 8;
                let bytes = data.get(index * size..index * size + size)?;
                let value = if self.big_endian() {
                    bytes.iter().fold(0u32, |v, b| (v << 8) | *b as u32)
                } else {
                    bytes.iter().rev().fold(0u32, |v, b| (v << 8) | *b as u32)
                };
                Some(value)
            }
        }
    }

    /// Store `value` at storage `index`.
    /// Returns `None` if the data is too short.
    pub(crate) fn write(&self, data: &mut [u8], index: usize, value: u32) -> Option<()> {
        if self.split_planes {
            let (ar, gb) = Self::split_plane_offsets(index);
            let [a, r, g, b] = value.to_be_bytes();
            data.get_mut(ar..ar + 2)?.copy_from_slice(&[a, r]);
            data.get_mut(gb..gb + 2)?.copy_from_slice(&[g, b]);
            return Some(());
        }

        match self.bits_per_pixel {
            4 => {
                let shift = self.nibble_shift(index);
                let byte = data.get_mut(index / 2)?;
                *byte = (*byte & !(0xF << shift)) | (((value & 0xF) as u8) << shift);
            }
            bits => {
                let size = bits / 8;
                let bytes = data.get_mut(index * size..index * size + size)?;
                if self.big_endian() {
                    bytes.copy_from_slice(&value.to_be_bytes()[4 - size..]);
                } else {
                    bytes.copy_from_slice(&value.to_le_bytes()[..size]);
                }
            }
        }
        Some(())
    }
}

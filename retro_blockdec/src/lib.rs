#![no_std]
//! Safe, no_std, pure Rust decoders for the 4x4 block compressed formats found in
//! console texture files.
//!
//! Every function decodes a single block to 4x4 RGBA8 pixels.
//! Rows of the decompressed block start `destination_pitch` bytes apart,
//! so blocks can be written directly into a larger surface.
//!
//! - [etc1] and [etc1a4] use the byte order of the 3DS GPU where each 64-bit word is little-endian.
//! - [dxt1] and [dxt5] use the usual DirectX layouts also known as BC1 and BC3.
//! - [cmpr_to_dxt1] converts GameCube and Wii CMPR sub-blocks to [dxt1] blocks.

/// Intensity modifiers indexed by the 3-bit table selector and the pixel's value bit.
/// The pixel's sign bit negates the modifier.
pub const ETC1_MODIFIERS: [[i32; 2]; 8] = [
    [2, 8],
    [5, 17],
    [9, 29],
    [13, 42],
    [18, 60],
    [24, 80],
    [33, 106],
    [47, 183],
];

/// Decodes an 8 byte ETC1 block stored as a single little-endian 64-bit word.
pub fn etc1(compressed_block: &[u8; 8], decompressed_block: &mut [u8], destination_pitch: usize) {
    let color = u64::from_le_bytes(*compressed_block);
    etc1_color_block(color, None, decompressed_block, destination_pitch);
}

/// Decodes a 16 byte ETC1A4 block.
/// The first 8 bytes store a 4-bit alpha value for each pixel
/// and the last 8 bytes store an [etc1] color block.
pub fn etc1a4(
    compressed_block: &[u8; 16],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    let alpha = read_u64_le(compressed_block, 0);
    let color = read_u64_le(compressed_block, 8);
    etc1_color_block(color, Some(alpha), decompressed_block, destination_pitch);
}

/// Decodes an 8 byte DXT1 block.
/// Blocks with `color0 <= color1` use 3 colors and transparent black.
pub fn dxt1(compressed_block: &[u8; 8], decompressed_block: &mut [u8], destination_pitch: usize) {
    color_block(
        compressed_block,
        decompressed_block,
        destination_pitch,
        false,
    );
}

/// Decodes a 16 byte DXT5 block.
/// The first 8 bytes store the interpolated alpha block
/// and the last 8 bytes store a color block that always uses 4 colors.
pub fn dxt5(compressed_block: &[u8; 16], decompressed_block: &mut [u8], destination_pitch: usize) {
    color_block(
        &compressed_block[8..],
        decompressed_block,
        destination_pitch,
        true,
    );
    alpha_block(compressed_block, decompressed_block, destination_pitch);
}

/// Converts an 8 byte CMPR sub-block to the byte layout expected by [dxt1].
///
/// CMPR stores both endpoints as big-endian RGB565 values
/// and places the first pixel of each row in the two most significant bits.
pub fn cmpr_to_dxt1(sub_block: &[u8; 8]) -> [u8; 8] {
    let [c0_hi, c0_lo, c1_hi, c1_lo, r0, r1, r2, r3] = *sub_block;
    [
        c0_lo,
        c0_hi,
        c1_lo,
        c1_hi,
        reverse_indices(r0),
        reverse_indices(r1),
        reverse_indices(r2),
        reverse_indices(r3),
    ]
}

fn reverse_indices(row: u8) -> u8 {
    ((row & 0x03) << 6) | ((row & 0x0C) << 2) | ((row & 0x30) >> 2) | ((row >> 6) & 0x03)
}

fn read_u64_le(bytes: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(word)
}

fn etc1_color_block(
    color: u64,
    alpha: Option<u64>,
    decompressed_block: &mut [u8],
    destination_pitch: usize,
) {
    let diff_bit = (color >> 33) & 1 == 1;
    let flip_bit = (color >> 32) & 1 == 1;

    let (base1, base2) = if diff_bit {
        // 5-bit base color and a 3-bit signed delta for the second sub-block.
        let r = ((color >> 59) & 0x1F) as i32;
        let g = ((color >> 51) & 0x1F) as i32;
        let b = ((color >> 43) & 0x1F) as i32;

        let r2 = r + sign_extend3(color >> 56);
        let g2 = g + sign_extend3(color >> 48);
        let b2 = b + sign_extend3(color >> 40);

        (
            [extend5(r), extend5(g), extend5(b)],
            [extend5(r2), extend5(g2), extend5(b2)],
        )
    } else {
        // Two independent 4-bit colors.
        let nibble = |shift: u64| ((color >> shift) & 0xF) as i32 * 0x11;
        (
            [nibble(60), nibble(52), nibble(44)],
            [nibble(56), nibble(48), nibble(40)],
        )
    };

    let table1 = ((color >> 37) & 0x7) as usize;
    let table2 = ((color >> 34) & 0x7) as usize;

    for y in 0..4 {
        for x in 0..4 {
            // Pixel indices are stored in column-major order.
            let bit = x * 4 + y;
            let value = ((color >> bit) & 1) as usize;
            let negative = (color >> (bit + 16)) & 1 == 1;

            let first_sub_block = if flip_bit { y < 2 } else { x < 2 };
            let (base, table) = if first_sub_block {
                (base1, table1)
            } else {
                (base2, table2)
            };

            let modifier = ETC1_MODIFIERS[table][value];
            let add = if negative { -modifier } else { modifier };

            let a = match alpha {
                Some(alpha) => ((alpha >> (bit * 4)) & 0xF) as u8 * 0x11,
                None => 255u8,
            };

            let start = y * destination_pitch + x * 4;
            decompressed_block[start..start + 4].copy_from_slice(&[
                clamp_u8(base[0] + add),
                clamp_u8(base[1] + add),
                clamp_u8(base[2] + add),
                a,
            ]);
        }
    }
}

fn sign_extend3(bits: u64) -> i32 {
    (((bits & 0x7) as i32) << 29) >> 29
}

fn extend5(v: i32) -> i32 {
    (v << 3) | ((v & 0x1C) >> 2)
}

fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

fn color_block(
    compressed_block: &[u8],
    decompressed_block: &mut [u8],
    destination_pitch: usize,
    only_opaque_mode: bool,
) {
    let mut ref_colors = [[0u8; 4]; 4];

    let c0 = u16::from_le_bytes([compressed_block[0], compressed_block[1]]);
    let c1 = u16::from_le_bytes([compressed_block[2], compressed_block[3]]);

    // Expand 565 ref colors to 888
    let [r0, g0, b0] = rgb565_to_rgb888(c0);
    ref_colors[0] = [r0 as u8, g0 as u8, b0 as u8, 255u8];

    let [r1, g1, b1] = rgb565_to_rgb888(c1);
    ref_colors[1] = [r1 as u8, g1 as u8, b1 as u8, 255u8];

    if c0 > c1 || only_opaque_mode {
        // color_2 = 2/3*color_0 + 1/3*color_1
        // color_3 = 1/3*color_0 + 2/3*color_1
        let r = (2 * r0 + r1 + 1) / 3;
        let g = (2 * g0 + g1 + 1) / 3;
        let b = (2 * b0 + b1 + 1) / 3;
        ref_colors[2] = [r as u8, g as u8, b as u8, 255u8];

        let r = (r0 + 2 * r1 + 1) / 3;
        let g = (g0 + 2 * g1 + 1) / 3;
        let b = (b0 + 2 * b1 + 1) / 3;
        ref_colors[3] = [r as u8, g as u8, b as u8, 255u8];
    } else {
        // color_2 = 1/2*color_0 + 1/2*color_1;
        // color_3 = 0;
        let r = (r0 + r1 + 1) >> 1;
        let g = (g0 + g1 + 1) >> 1;
        let b = (b0 + b1 + 1) >> 1;
        ref_colors[2] = [r as u8, g as u8, b as u8, 255u8];

        ref_colors[3] = [0u8; 4];
    }

    let mut color_indices = u32::from_le_bytes([
        compressed_block[4],
        compressed_block[5],
        compressed_block[6],
        compressed_block[7],
    ]);

    for i in 0..4 {
        for j in 0..4 {
            let idx = color_indices & 0x03;
            let start = i * destination_pitch + j * 4;
            decompressed_block[start..start + 4].copy_from_slice(&ref_colors[idx as usize]);
            color_indices >>= 2;
        }
    }
}

fn rgb565_to_rgb888(c: u16) -> [u32; 3] {
    let r = ((c >> 11) & 0x1F) as u32;
    let g = ((c >> 5) & 0x3F) as u32;
    let b = (c & 0x1F) as u32;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

fn alpha_palette(a0: u8, a1: u8) -> [u8; 8] {
    let (a0, a1) = (a0 as u32, a1 as u32);
    let mut palette = [a0 as u8, a1 as u8, 0, 0, 0, 0, 0, 0xFF];

    // Entries 2..8 step from a0 toward a1 in sevenths.
    // Otherwise entries 2..6 step in fifths followed by 0 and 255.
    let steps = if a0 > a1 { 7 } else { 5 };
    for (i, entry) in palette.iter_mut().enumerate().skip(2).take(steps as usize - 1) {
        let t = i as u32 - 1;
        *entry = (((steps - t) * a0 + t * a1 + 1) / steps) as u8;
    }
    palette
}

// Writes to the alpha byte of each RGBA8 pixel.
fn alpha_block(compressed_block: &[u8], decompressed_block: &mut [u8], destination_pitch: usize) {
    let palette = alpha_palette(compressed_block[0], compressed_block[1]);

    // 16 3-bit indices after the two endpoints.
    let indices = read_u64_le(compressed_block, 0) >> 16;
    for pixel in 0..16 {
        let (row, column) = (pixel / 4, pixel % 4);
        let index = (indices >> (pixel * 3)) & 0x7;
        decompressed_block[row * destination_pitch + column * 4 + 3] = palette[index as usize];
    }
}

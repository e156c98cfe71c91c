//! Conversions between packed integer pixels and RGBA8.
//!
//! A [ColorLayout] describes where each channel lives in a pixel value
//! after reading the pixel bytes as an integer.
//! Channels are rescaled to 8 bits with rounding,
//! so converting to a layout and back is lossless for representable values.
use crate::{PixelFormat, Tiling};

/// A single channel of `bits` bits starting at bit `shift`.
///
/// Channels hold between 1 and 24 bits and fit inside a `u32`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Channel {
    shift: u32,
    bits: u32,
}

impl Channel {
    /// Returns `None` if `bits` is outside `1..=24`
    /// or the channel does not fit in 32 bits.
    pub const fn try_new(shift: u32, bits: u32) -> Option<Self> {
        if bits == 0 || bits > 24 || shift > 32 - bits {
            None
        } else {
            Some(Self { shift, bits })
        }
    }

    /// Panics if the channel is not valid for [Channel::try_new].
    pub const fn new(shift: u32, bits: u32) -> Self {
        match Self::try_new(shift, bits) {
            Some(channel) => channel,
            None => panic!("channel must have 1 to 24 bits within a u32"),
        }
    }

    pub const fn shift(&self) -> u32 {
        self.shift
    }

    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// The largest value for this channel.
    pub const fn mask(&self) -> u32 {
        (1 << self.bits) - 1
    }

    fn read(&self, value: u32) -> u8 {
        let mask = self.mask();
        let v = (value >> self.shift) & mask;
        ((v * 255 + mask / 2) / mask) as u8
    }

    fn write(&self, value: u8) -> u32 {
        let mask = self.mask();
        ((value as u32 * mask + 127) / 255) << self.shift
    }
}

/// The channel locations for a packed pixel format.
///
/// Luminance formats use the same channel for red, green, and blue.
/// Missing channels decode to 255.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ColorLayout {
    pub a: Option<Channel>,
    pub r: Option<Channel>,
    pub g: Option<Channel>,
    pub b: Option<Channel>,
}

const fn rgba(r: Channel, g: Channel, b: Channel, a: Channel) -> ColorLayout {
    ColorLayout {
        a: Some(a),
        r: Some(r),
        g: Some(g),
        b: Some(b),
    }
}

const fn rgb(r: Channel, g: Channel, b: Channel) -> ColorLayout {
    ColorLayout {
        a: None,
        r: Some(r),
        g: Some(g),
        b: Some(b),
    }
}

const fn luminance(l: Channel, a: Option<Channel>) -> ColorLayout {
    ColorLayout {
        a,
        r: Some(l),
        g: Some(l),
        b: Some(l),
    }
}

const fn alpha(a: Channel) -> ColorLayout {
    ColorLayout {
        a: Some(a),
        r: None,
        g: None,
        b: None,
    }
}

impl ColorLayout {
    pub const L8: Self = luminance(Channel::new(0, 8), None);
    pub const A8: Self = alpha(Channel::new(0, 8));
    pub const LA4: Self = luminance(Channel::new(4, 4), Some(Channel::new(0, 4)));
    pub const LA8: Self = luminance(Channel::new(8, 8), Some(Channel::new(0, 8)));
    pub const HILO8: Self = ColorLayout {
        a: None,
        r: Some(Channel::new(8, 8)),
        g: Some(Channel::new(0, 8)),
        b: None,
    };
    pub const RGB565: Self = rgb(Channel::new(11, 5), Channel::new(5, 6), Channel::new(0, 5));
    pub const RGB8: Self = rgb(Channel::new(16, 8), Channel::new(8, 8), Channel::new(0, 8));
    /// RGB8 bytes in memory order read as a little-endian 24-bit value.
    pub const RGB888_LE: Self = rgb(Channel::new(0, 8), Channel::new(8, 8), Channel::new(16, 8));
    pub const RGBA5551: Self = rgba(
        Channel::new(11, 5),
        Channel::new(6, 5),
        Channel::new(1, 5),
        Channel::new(0, 1),
    );
    pub const RGBA4: Self = rgba(
        Channel::new(12, 4),
        Channel::new(8, 4),
        Channel::new(4, 4),
        Channel::new(0, 4),
    );
    pub const RGBA8: Self = rgba(
        Channel::new(24, 8),
        Channel::new(16, 8),
        Channel::new(8, 8),
        Channel::new(0, 8),
    );
    pub const L4: Self = luminance(Channel::new(0, 4), None);
    pub const A4: Self = alpha(Channel::new(0, 4));

    /// GX IA4 with alpha in the high nibble.
    pub const GX_IA4: Self = luminance(Channel::new(0, 4), Some(Channel::new(4, 4)));
    /// GX IA8 read as a big-endian `u16` with alpha in the first byte.
    pub const GX_IA8: Self = luminance(Channel::new(0, 8), Some(Channel::new(8, 8)));
    /// The combined AR and GB planes of GX RGBA8.
    pub const ARGB8888: Self = rgba(
        Channel::new(16, 8),
        Channel::new(8, 8),
        Channel::new(0, 8),
        Channel::new(24, 8),
    );

    /// RGBA8 bytes read as a little-endian `u32`.
    pub const RGBA8888_LE: Self = rgba(
        Channel::new(0, 8),
        Channel::new(8, 8),
        Channel::new(16, 8),
        Channel::new(24, 8),
    );

    /// The layout for pixels of `format` stored with `tiling`
    /// or `None` if `format` is block compressed.
    ///
    /// Linear RGB8 and RGBA8 store channels in memory order like DDS.
    /// Ctr stores them reversed.
    pub fn from_format(format: PixelFormat, tiling: Tiling) -> Option<Self> {
        match (format, tiling) {
            (PixelFormat::Rgb8, Tiling::Linear) => Some(Self::RGB888_LE),
            (PixelFormat::Rgba8, Tiling::Linear) => Some(Self::RGBA8888_LE),
            (PixelFormat::La4, Tiling::Gx) => Some(Self::GX_IA4),
            (PixelFormat::La8, Tiling::Gx) => Some(Self::GX_IA8),
            (PixelFormat::Rgba8, Tiling::Gx) => Some(Self::ARGB8888),
            (PixelFormat::L8, _) => Some(Self::L8),
            (PixelFormat::A8, _) => Some(Self::A8),
            (PixelFormat::La4, _) => Some(Self::LA4),
            (PixelFormat::La8, _) => Some(Self::LA8),
            (PixelFormat::Hilo8, _) => Some(Self::HILO8),
            (PixelFormat::Rgb565, _) => Some(Self::RGB565),
            (PixelFormat::Rgb8, _) => Some(Self::RGB8),
            (PixelFormat::Rgba5551, _) => Some(Self::RGBA5551),
            (PixelFormat::Rgba4, _) => Some(Self::RGBA4),
            (PixelFormat::Rgba8, _) => Some(Self::RGBA8),
            (PixelFormat::L4, _) => Some(Self::L4),
            (PixelFormat::A4, _) => Some(Self::A4),
            (PixelFormat::Etc1, _)
            | (PixelFormat::Etc1A4, _)
            | (PixelFormat::Dxt1, _)
            | (PixelFormat::Dxt5, _) => None,
        }
    }

    /// Returns `true` if red, green, and blue all refer to the same channel.
    pub fn is_luminance(&self) -> bool {
        self.r.is_some() && self.r == self.g && self.r == self.b
    }
}

/// Unpack `value` to RGBA8 using the channel positions in `layout`.
/**
```rust
use retro_texture::color::{unpack, ColorLayout};

assert_eq!([255, 0, 0, 255], unpack(0xF800, &ColorLayout::RGB565));
assert_eq!([0x12, 0x12, 0x12, 0x34], unpack(0x1234, &ColorLayout::LA8));
```
 */
pub fn unpack(value: u32, layout: &ColorLayout) -> [u8; 4] {
    let read = |c: Option<Channel>| c.map(|c| c.read(value)).unwrap_or(255u8);
    [read(layout.r), read(layout.g), read(layout.b), read(layout.a)]
}

/// Pack the RGBA8 channels into a value using the channel positions in `layout`.
///
/// Luminance layouts store the luma of `r`, `g`, and `b`.
pub fn to_color_format(a: u8, r: u8, g: u8, b: u8, layout: &ColorLayout) -> u32 {
    let mut value = 0u32;
    if layout.is_luminance() {
        if let Some(l) = layout.r {
            value |= l.write(luma(r, g, b));
        }
    } else {
        value |= layout.r.map(|c| c.write(r)).unwrap_or_default();
        value |= layout.g.map(|c| c.write(g)).unwrap_or_default();
        value |= layout.b.map(|c| c.write(b)).unwrap_or_default();
    }
    value |= layout.a.map(|c| c.write(a)).unwrap_or_default();
    value
}

/// Convert `value` from the `input` layout to the `output` layout.
pub fn convert_color(value: u32, input: &ColorLayout, output: &ColorLayout) -> u32 {
    let [r, g, b, a] = unpack(value, input);
    to_color_format(a, r, g, b, output)
}

// Integer Rec. 601 luma.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000) as u8
}

//! RGBA colors.
//!
//! The console's video hardware stores colors packed as `0xAABBGGRR`. `Color`
//! keeps the channels unpacked and converts to and from that layout with
//! [`Color::from_abgr`] / [`Color::to_abgr`].

/// A color in RGBA format (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Return the same color with a different alpha value.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Unpack a hardware `0xAABBGGRR` value.
    pub const fn from_abgr(v: u32) -> Self {
        Self {
            r: (v & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: ((v >> 16) & 0xff) as u8,
            a: (v >> 24) as u8,
        }
    }

    /// Pack into the hardware `0xAABBGGRR` layout.
    pub const fn to_abgr(self) -> u32 {
        self.r as u32 | (self.g as u32) << 8 | (self.b as u32) << 16 | (self.a as u32) << 24
    }

    /// Perceptual gray level using 3/4/2 channel weights.
    pub const fn gray_level(self) -> u8 {
        ((self.r as u32 * 3 + self.g as u32 * 4 + self.b as u32 * 2) / 9) as u8
    }

    pub const BLACK: Self = Self::from_abgr(0xff00_0000);
    pub const WHITE: Self = Self::from_abgr(0xffff_ffff);
    pub const GRAY: Self = Self::from_abgr(0xffcc_cccc);
    pub const DARK_GRAY: Self = Self::from_abgr(0xff77_7777);
    pub const RED: Self = Self::from_abgr(0xff00_00ff);
    pub const GREEN: Self = Self::from_abgr(0xff00_ff00);
    pub const BLUE: Self = Self::from_abgr(0xffff_0000);
    pub const YELLOW: Self = Self::from_abgr(0xff00_ffff);
    pub const MAGENTA: Self = Self::from_abgr(0xffff_00ff);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
}

/// Parse "#RRGGBB" or "#RRGGBBAA" into a `Color`.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.strip_prefix('#')?;
    let channel = |i: usize| u8::from_str_radix(s.get(i..i + 2)?, 16).ok();
    match s.len() {
        6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}

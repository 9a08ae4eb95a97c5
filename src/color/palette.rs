//! Fixed eight-entry indicator palette
//!
//! Colors are a 3-bit mask: bit 0 is red, bit 1 green, bit 2 blue. The same
//! value doubles as the 8-bit palette index used in configuration.

use core::fmt;

use super::{Rgb, blend_colors};

const COLOR_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

const RED_BIT: u8 = 0b001;
const GREEN_BIT: u8 = 0b010;
const BLUE_BIT: u8 = 0b100;

/// One of the eight colors a tri-color indicator can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PaletteColor {
    #[default]
    Black = 0b000,
    Red = 0b001,
    Green = 0b010,
    Yellow = 0b011,
    Blue = 0b100,
    Magenta = 0b101,
    Cyan = 0b110,
    White = 0b111,
}

impl PaletteColor {
    /// All palette entries in mask order.
    pub const ALL: [PaletteColor; 8] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// Build a color from its 3-bit mask. Bits above bit 2 are ignored.
    pub const fn from_mask(mask: u8) -> Self {
        Self::ALL[(mask & 0b111) as usize]
    }

    /// Build a color from an 8-bit palette index, rejecting indices past the palette.
    pub const fn from_index(index: u8) -> Option<Self> {
        if index > 0b111 {
            return None;
        }
        Some(Self::from_mask(index))
    }

    pub const fn mask(self) -> u8 {
        self as u8
    }

    pub const fn is_black(self) -> bool {
        self.mask() == 0
    }

    pub const fn has_red(self) -> bool {
        self.mask() & RED_BIT != 0
    }

    pub const fn has_green(self) -> bool {
        self.mask() & GREEN_BIT != 0
    }

    pub const fn has_blue(self) -> bool {
        self.mask() & BLUE_BIT != 0
    }

    /// Lowercase color name used in log lines.
    pub const fn name(self) -> &'static str {
        COLOR_NAMES[self.mask() as usize]
    }

    /// Resolve to an RGB value with every present channel at `brightness`.
    pub const fn to_rgb(self, brightness: u8) -> Rgb {
        Rgb {
            r: if self.has_red() { brightness } else { 0 },
            g: if self.has_green() { brightness } else { 0 },
            b: if self.has_blue() { brightness } else { 0 },
        }
    }

    /// Linear per-channel interpolation between two palette entries.
    ///
    /// `amount_of_b` of 0 yields `self`, 255 yields `other`.
    pub fn lerp(self, other: PaletteColor, amount_of_b: u8, brightness: u8) -> Rgb {
        blend_colors(self.to_rgb(brightness), other.to_rgb(brightness), amount_of_b)
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

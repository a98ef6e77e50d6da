// src/color.rs

//! Packed 24-bit RGB pixels and the handful of named colors accepted in the
//! configuration file.

use serde::{Deserialize, Serialize};

/// Packs red, green and blue components into `0x00RRGGBB`.
///
/// This is the pixel layout of a 24-bit TrueColor visual, which is what the
/// server expects in `XSetForeground`.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Splits a packed pixel back into its components. The top byte is ignored.
#[inline]
pub const fn components(pixel: u32) -> (u8, u8, u8) {
    ((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
}

pub const BLACK: u32 = rgb(0, 0, 0);
pub const WHITE: u32 = rgb(255, 255, 255);

/// Palette names accepted wherever the configuration file takes a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl NamedColor {
    /// The palette entry as a packed [`rgb`] pixel. Plain names are the
    /// darker shade, `bright_*` names the saturated one.
    pub const fn to_pixel(self) -> u32 {
        match self {
            NamedColor::Black => rgb(0, 0, 0),
            NamedColor::Red => rgb(205, 0, 0),
            NamedColor::Green => rgb(0, 205, 0),
            NamedColor::Yellow => rgb(205, 205, 0),
            NamedColor::Blue => rgb(0, 0, 238),
            NamedColor::Magenta => rgb(205, 0, 205),
            NamedColor::Cyan => rgb(0, 205, 205),
            NamedColor::White => rgb(229, 229, 229),
            NamedColor::BrightBlack => rgb(127, 127, 127),
            NamedColor::BrightRed => rgb(255, 0, 0),
            NamedColor::BrightGreen => rgb(0, 255, 0),
            NamedColor::BrightYellow => rgb(255, 255, 0),
            NamedColor::BrightBlue => rgb(92, 92, 255),
            NamedColor::BrightMagenta => rgb(255, 0, 255),
            NamedColor::BrightCyan => rgb(0, 255, 255),
            NamedColor::BrightWhite => rgb(255, 255, 255),
        }
    }
}

/// A color as written in the configuration file: either a palette name or
/// explicit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Rgb(u8, u8, u8),
}

impl Color {
    pub const fn to_pixel(self) -> u32 {
        match self {
            Color::Named(named) => named.to_pixel(),
            Color::Rgb(r, g, b) => rgb(r, g, b),
        }
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        Color::Named(named)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packs_components_in_order() {
        assert_eq!(rgb(255, 0, 0), 0xFF0000);
        assert_eq!(rgb(0, 255, 0), 0x00FF00);
        assert_eq!(rgb(0, 0, 255), 0x0000FF);
        assert_eq!(rgb(0x12, 0x34, 0x56), 0x123456);
        assert_eq!(WHITE, 0xFFFFFF);
        assert_eq!(BLACK, 0);
    }

    #[test]
    fn components_inverts_rgb() {
        assert_eq!(components(rgb(1, 2, 3)), (1, 2, 3));
        assert_eq!(components(0xFF00_00FF), (0, 0, 0xFF));
    }

    #[test]
    fn config_colors_parse_by_name_or_components() {
        let named: Color = serde_json::from_str("\"bright_red\"").unwrap();
        assert_eq!(named.to_pixel(), 0xFF0000);

        let explicit: Color = serde_json::from_str("[16, 32, 48]").unwrap();
        assert_eq!(explicit, Color::Rgb(16, 32, 48));
        assert_eq!(explicit.to_pixel(), 0x102030);
    }
}

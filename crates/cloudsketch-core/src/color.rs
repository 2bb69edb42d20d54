//! Color handling for diagram backgrounds.
//!
//! Diagram sources only accept `#RRGGBB` hex colors. The [`Color`] type wraps
//! `DynamicColor` from the color crate so renderers can emit it directly as
//! an SVG attribute.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};
use thiserror::Error;

/// Default group backgrounds, indexed by nesting depth modulo the palette length.
const GROUP_PALETTE: [&str; 3] = [
    "#e3f2fd", // blue
    "#fff8e1", // beige
    "#fbe9e7", // pink
];

/// Error returned when a color string is not a `#RRGGBB` hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color: {0:?}")]
pub struct ColorError(String);

/// An opaque sRGB color.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Parse a `#RRGGBB` hex color.
    ///
    /// Short forms, named colors and other CSS syntaxes are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use cloudsketch_core::color::Color;
    ///
    /// let blue = Color::from_hex("#e3f2fd").unwrap();
    /// assert_eq!(blue.to_hex(), "#e3f2fd");
    ///
    /// assert!(Color::from_hex("blue").is_err());
    /// assert!(Color::from_hex("#fff").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let valid = hex.strip_prefix('#').is_some_and(|digits| {
            digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
        });
        if !valid {
            return Err(ColorError(hex.to_string()));
        }

        DynamicColor::from_str(hex)
            .map(|color| Self { color })
            .map_err(|_| ColorError(hex.to_string()))
    }

    /// The default background for a group nested `depth` levels deep.
    pub fn group_default(depth: usize) -> Self {
        let hex = GROUP_PALETTE[depth % GROUP_PALETTE.len()];
        Self::from_hex(hex).unwrap_or_default()
    }

    /// Returns the 8-bit red, green and blue channels.
    pub fn rgb(self) -> (u8, u8, u8) {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        (rgba.r, rgba.g, rgba.b)
    }

    /// Formats the color as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Default for Color {
    fn default() -> Self {
        Self {
            color: DynamicColor::from_alpha_color(color::AlphaColor::<Srgb>::BLACK),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_color_from_hex() {
        let color = Color::from_hex("#FF8000").unwrap();
        assert_eq!(color.rgb(), (255, 128, 0));
        assert_eq!(color.to_hex(), "#ff8000");
    }

    #[test]
    fn test_color_from_hex_rejects_other_syntaxes() {
        for input in ["", "ff8000", "#ff800", "#ff80000", "#gg0000", "red", "rgb(0,0,0)"] {
            let err = Color::from_hex(input).unwrap_err();
            assert_eq!(err, ColorError(input.to_string()), "input: {input}");
        }
    }

    #[test]
    fn test_group_default_palette_rotates() {
        assert_eq!(Color::group_default(0).to_hex(), "#e3f2fd");
        assert_eq!(Color::group_default(1).to_hex(), "#fff8e1");
        assert_eq!(Color::group_default(2).to_hex(), "#fbe9e7");
        assert_eq!(Color::group_default(3), Color::group_default(0));
    }

    #[test]
    fn test_color_default_is_black() {
        assert_eq!(Color::default().to_hex(), "#000000");
    }

    #[test]
    fn test_color_eq_hash() {
        let a = Color::from_hex("#112233").unwrap();
        let b: Color = "#112233".parse().unwrap();
        let c = Color::from_hex("#332211").unwrap();

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }
}

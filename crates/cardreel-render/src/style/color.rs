//! Hex color values used by style definitions.
//!
//! Catalog colors are written as `#rrggbb` or `#rgb` strings. They are used
//! verbatim in the exported CSS and quantized to the 256-color palette for
//! the terminal surface.

use std::fmt;

use console::Color;
use serde::{Deserialize, Serialize};

use crate::util::rgb_to_ansi256;

/// An RGB color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb`. The leading `#` is optional.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("Invalid hex: {}", hex))
        };

        match hex.len() {
            3 if hex.is_ascii() => Ok(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            6 if hex.is_ascii() => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => Err(format!(
                "Invalid hex color: #{} (must be 3 or 6 digits)",
                hex
            )),
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Nearest 256-color palette entry, for terminal output.
    pub fn to_console(&self) -> Color {
        Color::Color256(rgb_to_ansi256(self.rgb()))
    }

    /// Relative luminance in `0.0..=1.0` (sRGB weights, no gamma correction).
    pub fn luminance(&self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

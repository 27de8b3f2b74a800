//! RGB color type

use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// 8-bit RGB color - exactly 3 bytes, castable to raw texel data
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(Error::InvalidColor(hex.to_string()));
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(Error::InvalidColor(hex.to_string())),
        };
        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| Error::InvalidColor(hex.to_string()))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }

    /// Perceived brightness (Rec. 601 weights), 0-255
    pub fn luma(self) -> f32 {
        0.299 * self.r() as f32 + 0.587 * self.g() as f32 + 0.114 * self.b() as f32
    }

    /// Squared euclidean distance in RGB space
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r() as i32 - other.r() as i32;
        let dg = self.g() as i32 - other.g() as i32;
        let db = self.b() as i32 - other.b() as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Scale brightness by `factor` (0 = black, 1 = unchanged)
    pub fn darken(self, factor: f32) -> Rgb {
        let f = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * f).round() as u8;
        Rgb([scale(self.r()), scale(self.g()), scale(self.b())])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = Error;

    fn try_from(hex: String) -> Result<Self> {
        Rgb::from_hex(&hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        assert_eq!(std::mem::size_of::<Rgb>(), 3);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#605C52").unwrap(), Rgb::new(0x60, 0x5c, 0x52));
        assert_eq!(Rgb::from_hex("2c2a25").unwrap(), Rgb::new(0x2c, 0x2a, 0x25));
        assert_eq!(Rgb::from_hex("#fa0").unwrap(), Rgb::new(0xff, 0xaa, 0x00));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(Rgb::new(1, 0xab, 255).to_string(), "#01abff");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(0x1a, 0x1c, 0x2c)).unwrap();
        assert_eq!(json, "\"#1a1c2c\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(0x1a, 0x1c, 0x2c));
    }

    #[test]
    fn test_darken() {
        assert_eq!(Rgb::new(200, 100, 50).darken(0.5), Rgb::new(100, 50, 25));
        assert_eq!(Rgb::WHITE.darken(0.0), Rgb::BLACK);
    }

    #[test]
    fn test_luma_ordering() {
        assert!(Rgb::WHITE.luma() > Rgb::new(128, 128, 128).luma());
        assert_eq!(Rgb::BLACK.luma(), 0.0);
    }
}

//! Palettes: the fixed color sets bricks are painted from

pub mod color;
pub mod colors;
pub mod lut;

pub use color::Rgb;
pub use lut::{ColorMetric, PaletteLut, PaletteLutCache};

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Named, ordered, non-empty color list with an outline (grid line) color
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaletteDef", into = "PaletteDef")]
pub struct Palette {
    name: String,
    outline: Rgb,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette with a black outline. Empty color lists are rejected.
    pub fn new(name: impl Into<String>, colors: Vec<Rgb>) -> Result<Self> {
        Self::with_outline(name, Rgb::BLACK, colors)
    }

    /// Create a palette with an explicit outline color
    pub fn with_outline(name: impl Into<String>, outline: Rgb, colors: Vec<Rgb>) -> Result<Self> {
        let name = name.into();
        if colors.is_empty() {
            return Err(Error::EmptyPalette { name });
        }
        Ok(Self { name, outline, colors })
    }

    /// Parse a palette from hex strings
    pub fn from_hex(name: impl Into<String>, hex: &[&str]) -> Result<Self> {
        let colors = hex.iter().map(|h| Rgb::from_hex(h)).collect::<Result<Vec<_>>>()?;
        Self::new(name, colors)
    }

    /// Look up a built-in palette by name
    pub fn builtin(name: &str) -> Option<Self> {
        colors::BUILTIN
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(n, c)| Self {
                name: n.to_string(),
                outline: Rgb::BLACK,
                colors: c.to_vec(),
            })
    }

    /// Built-in palette by name, as an error when unknown
    pub fn named(name: &str) -> Result<Self> {
        Self::builtin(name).ok_or_else(|| Error::UnknownPalette(name.to_string()))
    }

    /// Two-tone grey stone
    pub fn stone_brick() -> Self {
        Self::from_builtin("stone-brick", &colors::STONE_BRICK)
    }

    /// Nintendo Super Gameboy, used for earthy tiles
    pub fn super_gameboy() -> Self {
        Self::from_builtin("nintendo-super-gameboy", &colors::SUPER_GAMEBOY)
    }

    pub fn sweetie16() -> Self {
        Self::from_builtin("sweetie-16", &colors::SWEETIE16)
    }

    pub fn endesga16() -> Self {
        Self::from_builtin("endesga-16", &colors::ENDESGA16)
    }

    pub fn indecision() -> Self {
        Self::from_builtin("indecision", &colors::INDECISION)
    }

    pub fn ice_cream_gb() -> Self {
        Self::from_builtin("ice-cream-gb", &colors::ICE_CREAM_GB)
    }

    fn from_builtin(name: &str, colors: &[Rgb]) -> Self {
        Self {
            name: name.to_string(),
            outline: Rgb::BLACK,
            colors: colors.to_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn outline(&self) -> Rgb {
        self.outline
    }

    /// Colors, guaranteed non-empty
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Color for a uniform random value in [0, 1)
    pub fn pick(&self, r: f32) -> Rgb {
        let len = self.colors.len();
        let idx = ((r * len as f32) as usize).min(len - 1);
        self.colors[idx]
    }
}

/// Serialized palette form
#[derive(Clone, Debug, Serialize, Deserialize)]
struct PaletteDef {
    name: String,
    #[serde(default)]
    outline: Rgb,
    colors: Vec<Rgb>,
}

impl TryFrom<PaletteDef> for Palette {
    type Error = Error;

    fn try_from(def: PaletteDef) -> Result<Self> {
        Palette::with_outline(def.name, def.outline, def.colors)
    }
}

impl From<Palette> for PaletteDef {
    fn from(p: Palette) -> Self {
        PaletteDef {
            name: p.name,
            outline: p.outline,
            colors: p.colors,
        }
    }
}

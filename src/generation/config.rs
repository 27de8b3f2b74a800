//! Baking configuration, stored as JSON next to the output.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::palette::Palette;
use crate::texgen::material::{MaterialStyle, MaterialTable};
use crate::texgen::raster::TextureLayout;
use crate::texgen::strategy::OCCLUSION_STRENGTH;

/// Configuration for the tile baking pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// World seed for every random draw.
    pub seed: u64,
    /// Pixel layout of the baked faces.
    pub layout: TextureLayout,
    /// Occlusion applied to edges facing higher terrain, in [0, 1].
    pub occlusion_strength: f32,
    /// Style per tile kind.
    pub materials: MaterialTable,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            layout: TextureLayout::default(),
            occlusion_strength: OCCLUSION_STRENGTH,
            materials: MaterialTable::default(),
        }
    }
}

impl GenerationConfig {
    /// Default config with a different seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    /// Reject configs the pipeline cannot bake with.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        if !(0.0..=1.0).contains(&self.occlusion_strength) {
            return Err(Error::InvalidConfig(format!(
                "occlusion_strength {} outside [0, 1]",
                self.occlusion_strength
            )));
        }
        for (_, style) in self.materials.iter() {
            if let MaterialStyle::Brick { palette } = style {
                Palette::named(palette)?;
            }
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TileKind;

    #[test]
    fn test_default_is_valid() {
        GenerationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = GenerationConfig::with_seed(99);
        config.materials.set(
            TileKind::Grass,
            MaterialStyle::Brick { palette: "endesga-16".to_string() },
        );
        config.save(&path).unwrap();
        let loaded = GenerationConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GenerationConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.layout, TextureLayout::default());
        assert_eq!(config.materials, MaterialTable::default());
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = GenerationConfig::default();
        config.occlusion_strength = 1.5;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = GenerationConfig::default();
        config.layout.top_cells = (4, 3);
        assert!(matches!(config.validate(), Err(Error::InvalidLayout(_))));

        let mut config = GenerationConfig::default();
        config.materials.set(TileKind::Dirt, MaterialStyle::Brick { palette: "mauve".to_string() });
        assert!(matches!(config.validate(), Err(Error::UnknownPalette(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GenerationConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}

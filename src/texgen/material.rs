//! Per-material texture generators
//!
//! Each tile kind maps to a [`MaterialStyle`]: either a brick pattern drawn
//! from a palette, or a flat color (water). Styles are serializable so the
//! table can live in the generation config.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::generator::BrickGenerator;
use super::random::SpatialRandom;
use super::raster::{TextureLayout, TexturePack, TextureRasterizer};
use super::strategy::BrickStrategy;
use crate::core::{Result, TilePos};
use crate::map::{TileKind, TileMap};
use crate::palette::{Palette, Rgb};

/// Produces face textures for the tiles of one material.
///
/// `prepare` is called once per tile in scan order, before any `generate`
/// call for that tile. `generate` only reads prepared state, so faces can
/// be produced in parallel.
pub trait TextureGenerator: Send + Sync {
    fn prepare(&mut self, pos: TilePos) -> Result<()>;

    /// Texture for one face, `None` if the tile was never prepared
    fn generate(&self, pos: TilePos, face: Direction) -> Option<TexturePack>;
}

/// Brick-pattern textures backed by a [`BrickGenerator`]
pub struct BrickTextureGenerator<'a> {
    bricks: BrickGenerator<'a>,
    rasterizer: TextureRasterizer,
}

impl<'a> BrickTextureGenerator<'a> {
    pub fn new(bricks: BrickGenerator<'a>, layout: TextureLayout) -> Result<Self> {
        let rasterizer = TextureRasterizer::new(layout, bricks.palette().outline())?;
        let (width, height) = layout.top_cells;
        let bricks = if bricks.strategy().grid() == (width, height) {
            bricks
        } else {
            let strategy = bricks.strategy().clone().with_grid(width, height);
            bricks.with_strategy(strategy)
        };
        Ok(Self { bricks, rasterizer })
    }

    pub fn bricks(&self) -> &BrickGenerator<'a> {
        &self.bricks
    }
}

impl TextureGenerator for BrickTextureGenerator<'_> {
    fn prepare(&mut self, pos: TilePos) -> Result<()> {
        self.bricks.generate_at(pos).map(|_| ())
    }

    fn generate(&self, pos: TilePos, face: Direction) -> Option<TexturePack> {
        self.bricks
            .cache()
            .get(pos)
            .map(|brick| self.rasterizer.rasterize(brick, face))
    }
}

/// Single flat color with uniform alpha, no grid lines
#[derive(Clone, Debug)]
pub struct FlatTextureGenerator {
    layout: TextureLayout,
    color: Rgb,
    alpha: u8,
}

impl FlatTextureGenerator {
    pub fn new(layout: TextureLayout, color: Rgb, alpha: u8) -> Self {
        Self { layout, color, alpha }
    }
}

impl TextureGenerator for FlatTextureGenerator {
    fn prepare(&mut self, _pos: TilePos) -> Result<()> {
        Ok(())
    }

    fn generate(&self, _pos: TilePos, face: Direction) -> Option<TexturePack> {
        let (width, height) = self.layout.face_size(face);
        Some(TexturePack::solid(width, height, self.color, self.alpha))
    }
}

/// How a tile kind is textured
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum MaterialStyle {
    /// Brick pattern from a built-in palette
    Brick { palette: String },
    /// Flat color, e.g. translucent water
    Flat { color: Rgb, alpha: u8 },
}

impl MaterialStyle {
    /// Build the generator for `kind` tiles of `map`
    pub fn build<'a>(
        &self,
        map: &'a TileMap,
        kind: TileKind,
        seed: u64,
        layout: TextureLayout,
        occlusion_strength: f32,
    ) -> Result<Box<dyn TextureGenerator + 'a>> {
        match self {
            MaterialStyle::Brick { palette } => {
                let palette = Palette::named(palette)?;
                let rng = SpatialRandom::new(seed);
                let strategy = BrickStrategy::new(rng).with_occlusion_strength(occlusion_strength);
                let bricks = BrickGenerator::for_material(map, kind, palette, rng).with_strategy(strategy);
                Ok(Box::new(BrickTextureGenerator::new(bricks, layout)?))
            }
            MaterialStyle::Flat { color, alpha } => {
                Ok(Box::new(FlatTextureGenerator::new(layout, *color, *alpha)))
            }
        }
    }
}

/// Style for every tile kind
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialTable(BTreeMap<TileKind, MaterialStyle>);

impl MaterialTable {
    pub fn get(&self, kind: TileKind) -> Option<&MaterialStyle> {
        self.0.get(&kind)
    }

    pub fn set(&mut self, kind: TileKind, style: MaterialStyle) {
        self.0.insert(kind, style);
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileKind, &MaterialStyle)> {
        self.0.iter().map(|(&k, s)| (k, s))
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        let brick = |name: &str| MaterialStyle::Brick { palette: name.to_string() };
        let mut table = BTreeMap::new();
        table.insert(TileKind::StoneWall, brick("stone-brick"));
        table.insert(TileKind::Dirt, brick("nintendo-super-gameboy"));
        table.insert(TileKind::Gravel, brick("nintendo-super-gameboy"));
        table.insert(TileKind::RockyGround, brick("nintendo-super-gameboy"));
        table.insert(TileKind::Grass, brick("indecision"));
        table.insert(
            TileKind::Water,
            MaterialStyle::Flat {
                color: Rgb::new(0x18, 0x76, 0x7e),
                alpha: 128,
            },
        );
        table.insert(TileKind::WoodenPlank, brick("sweetie-16"));
        Self(table)
    }
}

//! Tile baking pipeline - turns a tile map into per-face textures.
//!
//! The pipeline runs in two phases:
//! 1. Prepare: every occupied tile, in scan order, is handed to the
//!    generator of its material. Brick generators build their bricks here,
//!    so the forward-only dependency order holds.
//! 2. Generate: visible faces of every tile are rasterized in parallel
//!    from the prepared state.

pub mod config;

pub use config::GenerationConfig;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use crate::core::{Error, Result, TilePos, offset};
use crate::map::{HeightField, TileKind, TileMap};
use crate::texgen::direction::Direction;
use crate::texgen::generator::scan_order;
use crate::texgen::material::{MaterialTable, TextureGenerator};
use crate::texgen::raster::{TextureLayout, TexturePack};

/// Which faces of a tile can be seen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceVisibility(u8);

impl FaceVisibility {
    /// Planar faces are visible above the neighbor column, +Z only on the
    /// topmost tile of a column, -Z never.
    pub fn compute(map: &dyn HeightField, pos: TilePos) -> Self {
        let column = map.height(pos.x as i64, pos.y as i64);
        let mut bits = 0;
        if pos.z < column {
            for dir in Direction::PLANAR {
                let n = offset(pos, dir.offset());
                if !map.is_occupied(n.x as i64, n.y as i64, n.z as i64) {
                    bits |= 1 << dir.index();
                }
            }
            if pos.z + 1 == column {
                bits |= 1 << Direction::PZ.index();
            }
        }
        Self(bits)
    }

    pub fn is_visible(&self, face: Direction) -> bool {
        self.0 & (1 << face.index()) != 0
    }

    pub fn is_hidden(&self) -> bool {
        self.0 == 0
    }

    /// Visible faces, +Z first
    pub fn visible_faces(self) -> impl Iterator<Item = Direction> {
        std::iter::once(Direction::PZ)
            .chain(Direction::PLANAR)
            .filter(move |&d| self.is_visible(d))
    }
}

/// Textures of every visible face of one tile
#[derive(Clone, Debug)]
pub struct BakedTile {
    pub pos: TilePos,
    pub kind: TileKind,
    pub faces: Vec<(Direction, TexturePack)>,
}

impl BakedTile {
    pub fn face(&self, dir: Direction) -> Option<&TexturePack> {
        self.faces.iter().find(|(d, _)| *d == dir).map(|(_, t)| t)
    }

    /// Write albedo and displacement PNGs for every face under
    /// `<output_dir>/<kind>/`. Returns the file count.
    pub fn write_images(&self, output_dir: &Path) -> Result<usize> {
        let dir = output_dir.join(self.kind.name());
        std::fs::create_dir_all(&dir)?;
        let (x, y, z) = (self.pos.x, self.pos.y, self.pos.z);
        for (face, pack) in &self.faces {
            let stem = format!("tile_{}_{}_{}_{}", x, y, z, face.name());
            if pack.alpha == 255 {
                pack.to_albedo_image().save(dir.join(format!("{}.png", stem)))?;
            } else {
                pack.to_rgba_image().save(dir.join(format!("{}.png", stem)))?;
            }
            pack.to_displacement_image().save(dir.join(format!("{}_disp.png", stem)))?;
        }
        Ok(self.faces.len() * 2)
    }
}

/// Drives one texture generator per material over a tile map
pub struct GenerationPipeline {
    seed: u64,
    layout: TextureLayout,
    occlusion_strength: f32,
    materials: MaterialTable,
}

impl GenerationPipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            seed: config.seed,
            layout: config.layout,
            occlusion_strength: config.occlusion_strength,
            materials: config.materials.clone(),
        })
    }

    pub fn layout(&self) -> &TextureLayout {
        &self.layout
    }

    fn generators<'a>(&self, map: &'a TileMap) -> Result<BTreeMap<TileKind, Box<dyn TextureGenerator + 'a>>> {
        let mut generators = BTreeMap::new();
        for kind in map.kinds_present() {
            let style = self
                .materials
                .get(kind)
                .ok_or_else(|| Error::InvalidConfig(format!("no material for {}", kind.name())))?;
            let generator = style.build(map, kind, self.seed, self.layout, self.occlusion_strength)?;
            generators.insert(kind, generator);
        }
        Ok(generators)
    }

    /// Bake every tile with at least one visible face, in scan order.
    pub fn bake(&self, map: &TileMap) -> Result<Vec<BakedTile>> {
        let start = Instant::now();
        let mut generators = self.generators(map)?;

        let mut tiles: Vec<(TilePos, TileKind)> = Vec::with_capacity(map.heights().tile_count());
        for pos in scan_order(map) {
            let kind = map.kind(pos).ok_or(Error::InvalidTileRequest { pos })?;
            if let Some(generator) = generators.get_mut(&kind) {
                generator.prepare(pos)?;
            }
            tiles.push((pos, kind));
        }
        let prepared = start.elapsed();

        let generators = &generators;
        let baked: Vec<BakedTile> = tiles
            .par_iter()
            .filter_map(|&(pos, kind)| {
                let visibility = FaceVisibility::compute(map, pos);
                if visibility.is_hidden() {
                    return None;
                }
                let generator = generators.get(&kind)?;
                let faces = visibility
                    .visible_faces()
                    .filter_map(|face| generator.generate(pos, face).map(|t| (face, t)))
                    .collect();
                Some(BakedTile { pos, kind, faces })
            })
            .collect();

        let (width, depth) = map.size();
        log::info!(
            "Baked {} of {} tiles ({} materials) for {}x{} map in {:.2?} (prepare {:.2?})",
            baked.len(),
            tiles.len(),
            generators.len(),
            width,
            depth,
            start.elapsed(),
            prepared
        );
        Ok(baked)
    }
}

//! Brick texture generation
//!
//! A tile's brick is two floors of voxel cells. Each voxel carries a color,
//! connection flags to its neighbors and per-face occlusion. Neighboring
//! voxels that connect share a color and are drawn without a grid line
//! between them, so one "brick" in the final texture can span cells,
//! floors and tiles.

pub mod brick;
pub mod cache;
pub mod direction;
pub mod generator;
pub mod material;
pub mod random;
pub mod raster;
pub mod strategy;
pub mod voxel;

pub use brick::{Brick, Floor, FloorLevel};
pub use cache::BrickCache;
pub use direction::{Dir8, Direction};
pub use generator::{BrickGenerator, scan_order};
pub use material::{
    BrickTextureGenerator, FlatTextureGenerator, MaterialStyle, MaterialTable, TextureGenerator,
};
pub use random::{Draw, SpatialRandom, VoxelKey};
pub use raster::{BrickTextures, TextureLayout, TexturePack, TextureRasterizer};
pub use strategy::{BrickContext, BrickNeighbors, BrickStrategy, HeightDiff, MaterialSeams, TileFlags};
pub use voxel::{Connections, Occlusion, Voxel};

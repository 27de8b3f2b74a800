//! Map data: column heights and tile materials

pub mod height_map;
pub mod tile_map;

pub use height_map::{HeightField, HeightMap, NoiseParams};
pub use tile_map::{TileKind, TileMap};

//! Brickwork - procedural brick textures for pixel-art isometric voxel tiles

pub mod core;
pub mod map;
pub mod palette;
pub mod texgen;
pub mod generation;

//! Core type aliases and re-exports

pub use glam::{IVec3, UVec3};

/// Tile coordinate in the voxel map: x east, y north, z up
pub type TilePos = UVec3;

/// Standard Result type for the crate
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Signed offset of a tile position, used for neighbor queries that may
/// fall off the map.
pub fn offset(pos: TilePos, delta: IVec3) -> IVec3 {
    pos.as_ivec3() + delta
}

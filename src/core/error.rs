//! Error types for brick generation and texture baking

use thiserror::Error;

use crate::texgen::direction::Direction;
use crate::core::types::TilePos;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid tile request at {pos}: tile is not occupied")]
    InvalidTileRequest { pos: TilePos },

    #[error("Palette '{name}' has no colors")]
    EmptyPalette { name: String },

    #[error("Unknown palette '{0}'")]
    UnknownPalette(String),

    #[error(transparent)]
    Sequencing(#[from] SequencingError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Invalid texture layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Map parse error on line {line}: {reason}")]
    MapParse { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A tile was requested before one of its occupied -X/-Y/-Z neighbors.
///
/// Connectivity only reconciles against already generated neighbors, so
/// generating out of order would leave an unreconciled seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Tile {pos} generated before its {missing:?} neighbor {neighbor}")]
pub struct SequencingError {
    pub pos: TilePos,
    pub missing: Direction,
    pub neighbor: TilePos,
}

/// Brick cache errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("Brick at {0} was already generated")]
    AlreadyGenerated(TilePos),

    #[error("Tile {0} is outside the cached map")]
    OutOfBounds(TilePos),
}

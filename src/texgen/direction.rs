//! Axis directions and planar compass directions

use glam::{IVec2, IVec3};
use serde::{Deserialize, Serialize};

/// One of the six axis directions. X is east, Y is north, Z is up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    PX,
    NX,
    PY,
    NY,
    PZ,
    NZ,
}

impl Direction {
    /// All six directions, in index order
    pub const ALL: [Direction; 6] = [
        Direction::PX,
        Direction::NX,
        Direction::PY,
        Direction::NY,
        Direction::PZ,
        Direction::NZ,
    ];

    /// The four side directions
    pub const PLANAR: [Direction; 4] = [Direction::PX, Direction::NX, Direction::PY, Direction::NY];

    /// Dense index 0..6
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::PX => Direction::NX,
            Direction::NX => Direction::PX,
            Direction::PY => Direction::NY,
            Direction::NY => Direction::PY,
            Direction::PZ => Direction::NZ,
            Direction::NZ => Direction::PZ,
        }
    }

    /// Unit step in tile space
    pub const fn offset(self) -> IVec3 {
        match self {
            Direction::PX => IVec3::new(1, 0, 0),
            Direction::NX => IVec3::new(-1, 0, 0),
            Direction::PY => IVec3::new(0, 1, 0),
            Direction::NY => IVec3::new(0, -1, 0),
            Direction::PZ => IVec3::new(0, 0, 1),
            Direction::NZ => IVec3::new(0, 0, -1),
        }
    }

    /// Whether this is a side (X or Y) direction
    pub const fn is_planar(self) -> bool {
        !matches!(self, Direction::PZ | Direction::NZ)
    }

    /// Lower-case name used in file names
    pub fn name(self) -> &'static str {
        match self {
            Direction::PX => "px",
            Direction::NX => "nx",
            Direction::PY => "py",
            Direction::NY => "ny",
            Direction::PZ => "pz",
            Direction::NZ => "nz",
        }
    }
}

/// Eight planar compass directions, E = +x and N = +y
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir8 {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Dir8 {
    pub const ALL: [Dir8; 8] = [
        Dir8::N,
        Dir8::S,
        Dir8::E,
        Dir8::W,
        Dir8::NE,
        Dir8::NW,
        Dir8::SE,
        Dir8::SW,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column offset (dx, dy)
    pub const fn offset(self) -> IVec2 {
        match self {
            Dir8::N => IVec2::new(0, 1),
            Dir8::S => IVec2::new(0, -1),
            Dir8::E => IVec2::new(1, 0),
            Dir8::W => IVec2::new(-1, 0),
            Dir8::NE => IVec2::new(1, 1),
            Dir8::NW => IVec2::new(-1, 1),
            Dir8::SE => IVec2::new(1, -1),
            Dir8::SW => IVec2::new(-1, -1),
        }
    }
}

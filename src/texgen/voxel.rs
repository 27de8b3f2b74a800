//! Texture voxel: one cell of a brick floor

use super::direction::Direction;
use crate::palette::Rgb;

/// Connection flags packed into one byte, one bit per [`Direction`].
///
/// A set bit means the voxel joins its neighbor in that direction with no
/// grid line between them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Connections(u8);

impl Connections {
    /// No joins in any direction
    pub const NONE: Connections = Connections(0);

    /// Joined in every direction
    pub const ALL: Connections = Connections(0b11_1111);

    pub fn get(self, dir: Direction) -> bool {
        self.0 & (1 << dir.index()) != 0
    }

    pub fn set(&mut self, dir: Direction, connected: bool) {
        if connected {
            self.0 |= 1 << dir.index();
        } else {
            self.0 &= !(1 << dir.index());
        }
    }

    /// Copy with one flag changed
    pub fn with(mut self, dir: Direction, connected: bool) -> Self {
        self.set(dir, connected);
        self
    }

    /// Raw bits, bit `i` for `Direction::ALL[i]`
    pub fn bits(self) -> u8 {
        self.0
    }
}

/// Ambient occlusion strength per visible face direction, each in [0, 1].
///
/// -Z is never visible so it has no slot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Occlusion([f32; 5]);

impl Occlusion {
    pub const NONE: Occlusion = Occlusion([0.0; 5]);

    pub fn get(&self, dir: Direction) -> f32 {
        match dir {
            Direction::NZ => 0.0,
            _ => self.0[dir.index()],
        }
    }

    /// Set a face's strength, clamped to [0, 1]. Writes to -Z are ignored.
    pub fn set(&mut self, dir: Direction, value: f32) {
        if dir != Direction::NZ {
            self.0[dir.index()] = value.clamp(0.0, 1.0);
        }
    }

    /// Strongest planar value
    pub fn max_planar(&self) -> f32 {
        Direction::PLANAR
            .iter()
            .map(|&d| self.get(d))
            .fold(0.0, f32::max)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }
}

/// One brick-floor cell
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Voxel {
    pub color: Rgb,
    pub connection: Connections,
    pub occlusion: Occlusion,
}

impl Voxel {
    pub fn new(color: Rgb, connection: Connections) -> Self {
        Self {
            color,
            connection,
            occlusion: Occlusion::NONE,
        }
    }

    /// Whether this voxel joins its neighbor in `dir`
    pub fn connected(&self, dir: Direction) -> bool {
        self.connection.get(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_bits() {
        let mut c = Connections::NONE;
        c.set(Direction::PX, true);
        c.set(Direction::NZ, true);
        assert!(c.get(Direction::PX));
        assert!(c.get(Direction::NZ));
        assert!(!c.get(Direction::NX));
        c.set(Direction::PX, false);
        assert!(!c.get(Direction::PX));
        assert_eq!(c.bits(), 1 << 5);
    }

    #[test]
    fn test_all_connections() {
        for dir in Direction::ALL {
            assert!(Connections::ALL.get(dir));
            assert!(!Connections::NONE.get(dir));
        }
        assert!(!Connections::ALL.with(Direction::PY, false).get(Direction::PY));
    }

    #[test]
    fn test_occlusion_clamped_and_nz_ignored() {
        let mut o = Occlusion::NONE;
        o.set(Direction::PX, 1.5);
        o.set(Direction::NY, 0.25);
        o.set(Direction::NZ, 0.9);
        assert_eq!(o.get(Direction::PX), 1.0);
        assert_eq!(o.get(Direction::NZ), 0.0);
        assert_eq!(o.max_planar(), 1.0);
        assert!(!o.is_zero());
        assert!(Occlusion::NONE.is_zero());
    }
}

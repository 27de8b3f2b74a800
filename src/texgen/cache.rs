//! Brick cache - write-once store of generated bricks
//!
//! Bricks are keyed by linear tile index `x + y * W + z * W * H`. Lookups
//! outside the map return `None` rather than erroring, so neighbor queries
//! at the map border need no special casing.

use std::collections::HashMap;

use super::brick::Brick;
use super::direction::Direction;
use super::strategy::{BelowJoins, BrickBuild, BrickNeighbors};
use crate::core::{CacheError, TilePos, UVec3, offset};

/// Generated bricks for one map
#[derive(Clone, Debug)]
pub struct BrickCache {
    width: u32,
    depth: u32,
    bricks: HashMap<usize, Brick>,
}

impl BrickCache {
    /// Create an empty cache for a `width x depth` map
    pub fn new(width: u32, depth: u32) -> Self {
        Self {
            width,
            depth,
            bricks: HashMap::new(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.depth)
    }

    /// Linear index for signed coordinates, `None` when off the map
    pub fn index_of(&self, x: i64, y: i64, z: i64) -> Option<usize> {
        if x < 0 || y < 0 || z < 0 || x >= self.width as i64 || y >= self.depth as i64 {
            return None;
        }
        let (w, d) = (self.width as usize, self.depth as usize);
        Some(x as usize + y as usize * w + z as usize * w * d)
    }

    /// Linear index of a tile position, `None` when off the map
    pub fn tile_index(&self, pos: TilePos) -> Option<usize> {
        self.index_of(pos.x as i64, pos.y as i64, pos.z as i64)
    }

    /// Tile position for a linear index
    pub fn pos_of(&self, index: usize) -> TilePos {
        let (w, d) = (self.width.max(1) as usize, self.depth.max(1) as usize);
        UVec3::new(
            (index % w) as u32,
            ((index / w) % d) as u32,
            (index / (w * d)) as u32,
        )
    }

    pub fn get(&self, pos: TilePos) -> Option<&Brick> {
        self.tile_index(pos).and_then(|i| self.bricks.get(&i))
    }

    /// Brick one step from `pos` in `dir`, if generated
    pub fn get_neighbor(&self, pos: TilePos, dir: Direction) -> Option<&Brick> {
        let p = offset(pos, dir.offset());
        self.index_of(p.x as i64, p.y as i64, p.z as i64)
            .and_then(|i| self.bricks.get(&i))
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        self.get(pos).is_some()
    }

    /// The -X, -Y and -Z bricks of `pos`, absent when off the map or not yet generated
    pub fn neighbors(&self, pos: TilePos) -> BrickNeighbors<'_> {
        BrickNeighbors {
            neg_x: self.get_neighbor(pos, Direction::NX),
            neg_y: self.get_neighbor(pos, Direction::NY),
            neg_z: self.get_neighbor(pos, Direction::NZ),
        }
    }

    /// Store a brick. Each position can be written exactly once.
    pub fn insert(&mut self, pos: TilePos, brick: Brick) -> Result<(), CacheError> {
        let index = self.tile_index(pos).ok_or(CacheError::OutOfBounds(pos))?;
        if self.bricks.contains_key(&index) {
            return Err(CacheError::AlreadyGenerated(pos));
        }
        self.bricks.insert(index, brick);
        Ok(())
    }

    /// Set +Z on the top floor of the brick at `below` for every joined cell
    pub fn apply_below_joins(&mut self, below: TilePos, joins: &BelowJoins) {
        if joins.is_empty() {
            return;
        }
        let Some(index) = self.tile_index(below) else {
            return;
        };
        match self.bricks.get_mut(&index) {
            Some(brick) => joins.apply(brick),
            None => log::warn!("Dropping {} +Z joins: no brick at {}", joins.cells().len(), below),
        }
    }

    /// Apply a build's back-edge to the brick below, then store the brick
    pub fn commit(&mut self, pos: TilePos, build: BrickBuild) -> Result<(), CacheError> {
        if self.contains(pos) {
            return Err(CacheError::AlreadyGenerated(pos));
        }
        if pos.z > 0 {
            self.apply_below_joins(pos - UVec3::Z, &build.below_joins);
        }
        self.insert(pos, build.brick)
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Iterate `(position, brick)` in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (TilePos, &Brick)> {
        self.bricks.iter().map(|(&i, b)| (self.pos_of(i), b))
    }

    /// Generated positions in index order (z outer, then y, then x)
    pub fn positions(&self) -> Vec<TilePos> {
        let mut indices: Vec<usize> = self.bricks.keys().copied().collect();
        indices.sort_unstable();
        indices.into_iter().map(|i| self.pos_of(i)).collect()
    }

    pub(crate) fn raw(&self) -> &HashMap<usize, Brick> {
        &self.bricks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgb;
    use crate::texgen::voxel::{Connections, Voxel};

    fn brick() -> Brick {
        Brick::filled(4, 4, Voxel::new(Rgb::WHITE, Connections::NONE))
    }

    #[test]
    fn test_index_roundtrip() {
        let cache = BrickCache::new(3, 2);
        assert_eq!(cache.index_of(1, 1, 0), Some(4));
        assert_eq!(cache.index_of(2, 1, 2), Some(2 + 3 + 12));
        for i in [0, 4, 17, 100] {
            assert_eq!(cache.tile_index(cache.pos_of(i)), Some(i));
        }
    }

    #[test]
    fn test_out_of_bounds_lookups() {
        let cache = BrickCache::new(2, 2);
        assert_eq!(cache.index_of(-1, 0, 0), None);
        assert_eq!(cache.index_of(0, 2, 0), None);
        assert_eq!(cache.index_of(0, 0, -1), None);
        assert!(cache.get(UVec3::new(5, 0, 0)).is_none());
        let n = cache.neighbors(UVec3::ZERO);
        assert!(n.neg_x.is_none() && n.neg_y.is_none() && n.neg_z.is_none());
    }

    #[test]
    fn test_write_once() {
        let mut cache = BrickCache::new(2, 2);
        let pos = UVec3::new(1, 0, 0);
        cache.insert(pos, brick()).unwrap();
        assert_eq!(cache.insert(pos, brick()), Err(CacheError::AlreadyGenerated(pos)));
        assert_eq!(
            cache.insert(UVec3::new(2, 0, 0), brick()),
            Err(CacheError::OutOfBounds(UVec3::new(2, 0, 0)))
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_neighbors() {
        let mut cache = BrickCache::new(2, 2);
        cache.insert(UVec3::new(0, 1, 0), brick()).unwrap();
        cache.insert(UVec3::new(1, 0, 0), brick()).unwrap();
        cache.insert(UVec3::new(1, 1, 0), brick()).unwrap();
        let n = cache.neighbors(UVec3::new(1, 1, 1));
        assert!(n.neg_x.is_none());
        assert!(n.neg_y.is_none());
        assert!(n.neg_z.is_some());
        let n = cache.neighbors(UVec3::new(1, 1, 0));
        assert!(n.neg_x.is_some() && n.neg_y.is_some() && n.neg_z.is_none());
    }

    #[test]
    fn test_positions_in_index_order() {
        let mut cache = BrickCache::new(2, 2);
        for pos in [UVec3::new(1, 1, 0), UVec3::new(0, 0, 1), UVec3::new(1, 0, 0)] {
            cache.insert(pos, brick()).unwrap();
        }
        assert_eq!(
            cache.positions(),
            vec![UVec3::new(1, 0, 0), UVec3::new(1, 1, 0), UVec3::new(0, 0, 1)]
        );
    }
}

//! Scan driver: generates bricks in dependency order and caches them
//!
//! Connectivity only reconciles against bricks that already exist, so every
//! tile's -X, -Y and -Z neighbors must be generated first. [`scan_order`]
//! yields such an order (y outer, x inner, z ascending) and
//! [`BrickGenerator::generate_at`] rejects requests that would break it.

use std::time::Instant;

use super::brick::Brick;
use super::cache::BrickCache;
use super::direction::Direction;
use super::random::SpatialRandom;
use super::strategy::{BrickContext, BrickStrategy, MaterialSeams};
use crate::core::{Error, Result, SequencingError, TilePos, UVec3, offset};
use crate::map::{HeightField, TileKind, TileMap};
use crate::palette::Palette;

/// Every occupied tile in generation order: y outer, x inner, z ascending
pub fn scan_order(map: &dyn HeightField) -> impl Iterator<Item = TilePos> + '_ {
    let (width, depth) = map.size();
    (0..depth).flat_map(move |y| {
        (0..width).flat_map(move |x| {
            (0..map.height(x as i64, y as i64)).map(move |z| UVec3::new(x, y, z))
        })
    })
}

/// Which occupied tiles a generator is responsible for
#[derive(Clone, Copy)]
enum Membership<'a> {
    All,
    Kind(&'a TileMap, TileKind),
}

/// Generates and caches the bricks of one map (or one material of a map)
pub struct BrickGenerator<'a> {
    map: &'a dyn HeightField,
    membership: Membership<'a>,
    palette: Palette,
    strategy: BrickStrategy,
    cache: BrickCache,
}

impl<'a> BrickGenerator<'a> {
    /// Generator owning every occupied tile of `map`
    pub fn new(map: &'a dyn HeightField, palette: Palette, rng: SpatialRandom) -> Self {
        let (width, depth) = map.size();
        Self {
            map,
            membership: Membership::All,
            palette,
            strategy: BrickStrategy::new(rng),
            cache: BrickCache::new(width, depth),
        }
    }

    /// Generator owning only the tiles of one material. Bricks never join
    /// across a material change.
    pub fn for_material(map: &'a TileMap, kind: TileKind, palette: Palette, rng: SpatialRandom) -> Self {
        let mut generator = Self::new(map, palette, rng);
        generator.membership = Membership::Kind(map, kind);
        generator
    }

    /// Replace the strategy (grid size, occlusion strength)
    pub fn with_strategy(mut self, strategy: BrickStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn strategy(&self) -> &BrickStrategy {
        &self.strategy
    }

    pub fn cache(&self) -> &BrickCache {
        &self.cache
    }

    pub fn into_cache(self) -> BrickCache {
        self.cache
    }

    /// Whether this generator owns the tile at (x, y, z)
    pub fn owns(&self, x: i64, y: i64, z: i64) -> bool {
        if !self.map.is_occupied(x, y, z) {
            return false;
        }
        match self.membership {
            Membership::All => true,
            Membership::Kind(tiles, kind) => tiles.kind_at(x, y, z) == Some(kind),
        }
    }

    fn owns_pos(&self, pos: TilePos) -> bool {
        self.owns(pos.x as i64, pos.y as i64, pos.z as i64)
    }

    fn seams(&self, pos: TilePos) -> MaterialSeams {
        let (x, y, z) = (pos.x as i64, pos.y as i64, pos.z as i64);
        let foreign = |x, y| self.map.is_occupied(x, y, z) && !self.owns(x, y, z);
        MaterialSeams {
            east: foreign(x + 1, y),
            north: foreign(x, y + 1),
        }
    }

    /// Check that every owned -X/-Y/-Z neighbor is already generated
    fn check_sequence(&self, pos: TilePos) -> std::result::Result<(), SequencingError> {
        for dir in [Direction::NX, Direction::NY, Direction::NZ] {
            let n = offset(pos, dir.offset());
            if self.owns(n.x as i64, n.y as i64, n.z as i64) {
                let neighbor = n.as_uvec3();
                if !self.cache.contains(neighbor) {
                    return Err(SequencingError { pos, missing: dir, neighbor });
                }
            }
        }
        Ok(())
    }

    /// Generate, reconcile and cache the brick at `pos`
    pub fn generate_at(&mut self, pos: TilePos) -> Result<&Brick> {
        if !self.owns_pos(pos) {
            return Err(Error::InvalidTileRequest { pos });
        }
        self.check_sequence(pos)?;

        let ctx = BrickContext::new(self.map, pos, &self.palette)
            .with_neighbors(self.cache.neighbors(pos))
            .with_seams(self.seams(pos));
        let build = self.strategy.create_brick(&ctx);
        self.cache.commit(pos, build)?;

        self.cache.get(pos).ok_or(Error::InvalidTileRequest { pos })
    }

    /// Generate every owned tile in scan order. Returns the number generated.
    pub fn generate_all(&mut self) -> Result<usize> {
        let start = Instant::now();
        let positions: Vec<TilePos> = scan_order(self.map).filter(|&p| self.owns_pos(p)).collect();

        for &pos in &positions {
            if !self.cache.contains(pos) {
                self.generate_at(pos)?;
            }
        }

        let (width, depth) = self.map.size();
        log::info!(
            "Generated {} bricks ({} palette) for {}x{} map in {:.2?}",
            positions.len(),
            self.palette.name(),
            width,
            depth,
            start.elapsed()
        );
        Ok(positions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{HeightMap, NoiseParams};
    use crate::texgen::brick::FloorLevel;
    use crate::texgen::voxel::Voxel;

    fn generate(map: &HeightMap, seed: u64) -> BrickCache {
        let mut generator = BrickGenerator::new(map, Palette::sweetie16(), SpatialRandom::new(seed));
        generator.generate_all().expect("generation failed");
        generator.into_cache()
    }

    fn noise_map(seed: u32) -> HeightMap {
        let params = NoiseParams {
            seed,
            scale: 3.0,
            max_height: 4,
            ..Default::default()
        };
        HeightMap::from_noise(8, 8, &params)
    }

    /// Voxel across `dir` from cell (x, y) of `level`, `None` when no brick is there
    fn across<'c>(
        cache: &'c BrickCache,
        pos: TilePos,
        level: FloorLevel,
        x: u32,
        y: u32,
        dir: Direction,
    ) -> Option<&'c Voxel> {
        let brick = cache.get(pos)?;
        let (w, h) = brick.grid_size();
        match dir {
            Direction::PX if x + 1 < w => Some(brick.floor(level).get(x + 1, y)),
            Direction::PX => Some(cache.get_neighbor(pos, dir)?.floor(level).get(0, y)),
            Direction::NX if x > 0 => Some(brick.floor(level).get(x - 1, y)),
            Direction::NX => Some(cache.get_neighbor(pos, dir)?.floor(level).get(w - 1, y)),
            Direction::PY if y + 1 < h => Some(brick.floor(level).get(x, y + 1)),
            Direction::PY => Some(cache.get_neighbor(pos, dir)?.floor(level).get(x, 0)),
            Direction::NY if y > 0 => Some(brick.floor(level).get(x, y - 1)),
            Direction::NY => Some(cache.get_neighbor(pos, dir)?.floor(level).get(x, h - 1)),
            Direction::PZ if level == FloorLevel::Bottom => Some(brick.top.get(x, y)),
            Direction::PZ => Some(cache.get_neighbor(pos, dir)?.bottom.get(x, y)),
            Direction::NZ if level == FloorLevel::Top => Some(brick.bottom.get(x, y)),
            Direction::NZ => Some(cache.get_neighbor(pos, dir)?.top.get(x, y)),
        }
    }

    /// Every join is mirrored by the neighbor, joins never point at a
    /// missing brick, and joined voxels share a color. Equal colors on every
    /// joined edge means every joined region is uniformly colored.
    fn assert_consistent(cache: &BrickCache) {
        for pos in cache.positions() {
            let brick = cache.get(pos).unwrap();
            for level in FloorLevel::BUILD_ORDER {
                for (x, y, voxel) in brick.floor(level).iter() {
                    for dir in Direction::ALL {
                        let flag = voxel.connected(dir);
                        match across(cache, pos, level, x, y, dir) {
                            Some(other) => {
                                assert_eq!(
                                    flag,
                                    other.connected(dir.opposite()),
                                    "asymmetric {:?} join at {} {:?} ({}, {})",
                                    dir,
                                    pos,
                                    level,
                                    x,
                                    y
                                );
                                if flag {
                                    assert_eq!(voxel.color, other.color, "color split at {} {:?} ({}, {})", pos, level, x, y);
                                }
                            }
                            None => assert!(!flag, "{:?} join into nothing at {} {:?} ({}, {})", dir, pos, level, x, y),
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_scan_order() {
        let map = HeightMap::new(2, 2, vec![1, 0, 2, 1]).unwrap();
        let order: Vec<TilePos> = scan_order(&map).collect();
        assert_eq!(
            order,
            vec![
                UVec3::new(0, 0, 0),
                UVec3::new(0, 1, 0),
                UVec3::new(0, 1, 1),
                UVec3::new(1, 1, 0),
            ]
        );
    }

    #[test]
    fn test_generate_all_counts_tiles() {
        let map = noise_map(3);
        let cache = generate(&map, 1);
        assert_eq!(cache.len(), map.tile_count());
    }

    #[test]
    fn test_generation_deterministic() {
        let map = noise_map(5);
        let a = generate(&map, 77);
        let b = generate(&map, 77);
        for pos in a.positions() {
            assert_eq!(a.get(pos), b.get(pos));
        }
    }

    #[test]
    fn test_flat_map_consistent() {
        for seed in 0..10 {
            assert_consistent(&generate(&HeightMap::flat(4, 3, 1), seed));
        }
    }

    #[test]
    fn test_stepped_map_consistent() {
        let map = HeightMap::new(4, 4, vec![1, 2, 3, 4, 2, 2, 3, 1, 3, 1, 1, 2, 4, 3, 2, 1]).unwrap();
        for seed in 0..10 {
            assert_consistent(&generate(&map, seed));
        }
    }

    #[test]
    fn test_noise_maps_consistent() {
        for map_seed in 0..6 {
            let map = noise_map(map_seed);
            for seed in 0..4 {
                assert_consistent(&generate(&map, seed));
            }
        }
    }

    #[test]
    fn test_mixed_materials_consistent() {
        let text = "3,3\n2,0,1\n1,1\n2,1,1\n1,0\n3,0,0,1\n1,1\n2,0,0\n1,0\n1,1\n";
        let map = TileMap::parse(text).unwrap();
        for kind in map.kinds_present() {
            for seed in 0..6 {
                let mut generator = BrickGenerator::for_material(&map, kind, Palette::sweetie16(), SpatialRandom::new(seed));
                generator.generate_all().unwrap();
                let cache = generator.into_cache();
                for pos in cache.positions() {
                    assert_eq!(map.kind(pos), Some(kind));
                }
                assert_consistent(&cache);
            }
        }
    }

    #[test]
    fn test_occlusion_only_on_topmost() {
        let map = noise_map(11);
        let cache = generate(&map, 9);
        for pos in cache.positions() {
            let brick = cache.get(pos).unwrap();
            assert!(brick.bottom.iter().all(|(_, _, v)| v.occlusion.is_zero()));
            if pos.z + 1 != map.height(pos.x as i64, pos.y as i64) {
                assert!(brick.top.iter().all(|(_, _, v)| v.occlusion.get(Direction::PZ) == 0.0));
            }
        }
    }

    #[test]
    fn test_invalid_request() {
        let map = HeightMap::new(2, 1, vec![1, 0]).unwrap();
        let mut generator = BrickGenerator::new(&map, Palette::stone_brick(), SpatialRandom::default());
        for pos in [UVec3::new(1, 0, 0), UVec3::new(0, 0, 1), UVec3::new(5, 0, 0)] {
            assert!(matches!(generator.generate_at(pos), Err(Error::InvalidTileRequest { pos: p }) if p == pos));
        }
    }

    #[test]
    fn test_sequencing_error() {
        let map = HeightMap::flat(2, 2, 2);
        let mut generator = BrickGenerator::new(&map, Palette::stone_brick(), SpatialRandom::default());

        match generator.generate_at(UVec3::new(1, 0, 0)) {
            Err(Error::Sequencing(e)) => {
                assert_eq!(e.missing, Direction::NX);
                assert_eq!(e.neighbor, UVec3::new(0, 0, 0));
            }
            other => panic!("expected sequencing error, got {:?}", other.map(|_| ())),
        }

        generator.generate_at(UVec3::new(0, 0, 0)).unwrap();
        match generator.generate_at(UVec3::new(0, 1, 1)) {
            Err(Error::Sequencing(e)) => assert_eq!(e.missing, Direction::NY),
            other => panic!("expected sequencing error, got {:?}", other.map(|_| ())),
        }
        match generator.generate_at(UVec3::new(0, 0, 1)) {
            Ok(_) => {}
            Err(e) => panic!("unexpected error {}", e),
        }
    }

    #[test]
    fn test_regenerate_rejected() {
        let map = HeightMap::flat(1, 1, 1);
        let mut generator = BrickGenerator::new(&map, Palette::stone_brick(), SpatialRandom::default());
        generator.generate_at(UVec3::ZERO).unwrap();
        assert!(matches!(
            generator.generate_at(UVec3::ZERO),
            Err(Error::Cache(crate::core::CacheError::AlreadyGenerated(_)))
        ));
    }

    #[test]
    fn test_other_material_is_not_a_dependency() {
        // Dirt at x = 0 never blocks stone at x = 1
        let map = TileMap::parse("2,1\n1,1\n1,0\n").unwrap();
        let mut generator = BrickGenerator::for_material(&map, TileKind::StoneWall, Palette::stone_brick(), SpatialRandom::default());
        assert!(generator.generate_at(UVec3::new(1, 0, 0)).is_ok());
        assert!(matches!(generator.generate_at(UVec3::ZERO), Err(Error::InvalidTileRequest { .. })));
    }
}

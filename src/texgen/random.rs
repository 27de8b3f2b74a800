//! Stateless, coordinate-keyed randomness
//!
//! Every draw is a pure function of its key, so any voxel's pattern can be
//! re-derived from its coordinates without replaying generation.

use super::brick::FloorLevel;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// splitmix64 finalizer
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Uniform float in [0, 1) for a seed. Pure and total.
#[inline]
pub fn random_at(seed: u64) -> f32 {
    // Top 24 bits fit the f32 mantissa exactly, so the result never rounds up to 1.0
    (mix64(seed.wrapping_add(GOLDEN_GAMMA)) >> 40) as f32 / (1u32 << 24) as f32
}

/// What a draw is used for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Draw {
    ConnectX,
    ConnectY,
    ConnectZ,
    Color,
}

/// Address of one random draw inside the map
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelKey {
    /// Linear tile index `x + y * W + z * W * H`
    pub tile_index: u64,
    pub floor: FloorLevel,
    /// Row-major cell index within the floor
    pub cell: u32,
    pub draw: Draw,
}

impl VoxelKey {
    pub fn new(tile_index: u64, floor: FloorLevel, cell: u32, draw: Draw) -> Self {
        Self { tile_index, floor, cell, draw }
    }
}

/// Randomness for a whole map, salted by a world seed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpatialRandom {
    world_seed: u64,
}

impl SpatialRandom {
    pub fn new(world_seed: u64) -> Self {
        Self { world_seed }
    }

    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    /// Seed for a key
    pub fn seed_for(&self, key: VoxelKey) -> u64 {
        let low = ((key.cell as u64) << 8) | ((key.floor.index() as u64) << 4) | key.draw as u64;
        let h = mix64(self.world_seed ^ GOLDEN_GAMMA);
        let h = mix64(h ^ key.tile_index);
        h ^ low.wrapping_mul(GOLDEN_GAMMA)
    }

    /// Uniform value in [0, 1)
    pub fn value(&self, key: VoxelKey) -> f32 {
        random_at(self.seed_for(key))
    }

    /// True with probability `p`
    pub fn chance(&self, key: VoxelKey, p: f32) -> bool {
        self.value(key) < p
    }

    /// Index in `0..len`. `len` must be non-zero.
    pub fn pick(&self, key: VoxelKey, len: usize) -> usize {
        ((self.value(key) * len as f32) as usize).min(len.saturating_sub(1))
    }
}

impl Default for SpatialRandom {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(tile: u64, cell: u32, draw: Draw) -> VoxelKey {
        VoxelKey::new(tile, FloorLevel::Top, cell, draw)
    }

    #[test]
    fn test_random_at_range() {
        for seed in [0, 1, u64::MAX, 0xDEAD_BEEF, 1 << 63] {
            let v = random_at(seed);
            assert!((0.0..1.0).contains(&v), "{} out of range for seed {}", v, seed);
        }
    }

    #[test]
    fn test_random_at_is_pure() {
        for seed in 0..100 {
            assert_eq!(random_at(seed), random_at(seed));
        }
    }

    #[test]
    fn test_roughly_uniform() {
        let n = 10_000;
        let mean: f32 = (0..n).map(random_at).sum::<f32>() / n as f32;
        assert!((mean - 0.5).abs() < 0.02, "mean {}", mean);
        let below_half = (0..n).filter(|&s| random_at(s) < 0.5).count();
        assert!((4700..5300).contains(&below_half), "{}", below_half);
    }

    #[test]
    fn test_keys_are_independent() {
        let rng = SpatialRandom::new(7);
        let a = rng.value(key(3, 5, Draw::ConnectX));
        assert_ne!(a, rng.value(key(3, 5, Draw::ConnectY)));
        assert_ne!(a, rng.value(key(4, 5, Draw::ConnectX)));
        assert_ne!(a, rng.value(key(3, 6, Draw::ConnectX)));
        assert_ne!(a, rng.value(VoxelKey::new(3, FloorLevel::Bottom, 5, Draw::ConnectX)));
        assert_ne!(a, SpatialRandom::new(8).value(key(3, 5, Draw::ConnectX)));
    }

    #[test]
    fn test_pick_in_bounds() {
        let rng = SpatialRandom::new(99);
        for tile in 0..200 {
            let idx = rng.pick(key(tile, 0, Draw::Color), 3);
            assert!(idx < 3);
        }
    }
}

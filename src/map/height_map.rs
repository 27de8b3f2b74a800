//! Column heightmap, the only spatial ground truth the brick generator reads

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Read-only query interface over a grid of column heights.
///
/// Out-of-bounds queries (including negative coordinates) return 0.
/// Implementations are immutable once built, so they are shared across
/// rasterizer threads.
pub trait HeightField: Send + Sync {
    /// Map size in tiles as (width, depth)
    fn size(&self) -> (u32, u32);

    /// Height of the column at (x, y), 0 when off the map
    fn height(&self, x: i64, y: i64) -> u32;

    /// Whether the tile (x, y, z) is occupied
    fn is_occupied(&self, x: i64, y: i64, z: i64) -> bool {
        z >= 0 && z < self.height(x, y) as i64
    }
}

/// Parameters for noise-generated heightmaps (tooling and benches)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoiseParams {
    pub seed: u32,
    pub scale: f32,       // Horizontal scale (larger = smoother)
    pub max_height: u32,  // Tallest possible column
    pub octaves: u32,     // FBM octaves (detail levels)
    pub persistence: f32, // FBM persistence (0.5 typical)
    pub lacunarity: f32,  // FBM lacunarity (2.0 typical)
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 12.0,
            max_height: 6,
            octaves: 3,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Dense grid of non-negative column heights, row-major `x + y * width`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HeightMapDef", into = "HeightMapDef")]
pub struct HeightMap {
    width: u32,
    depth: u32,
    heights: Vec<u32>,
}

impl HeightMap {
    /// Create a heightmap from raw heights
    pub fn new(width: u32, depth: u32, heights: Vec<u32>) -> Result<Self> {
        let expected = width as usize * depth as usize;
        if heights.len() != expected {
            return Err(Error::MapParse {
                line: 0,
                reason: format!(
                    "expected {} heights for a {}x{} map, got {}",
                    expected, width, depth, heights.len()
                ),
            });
        }
        Ok(Self { width, depth, heights })
    }

    /// Flat map where every column has the same height
    pub fn flat(width: u32, depth: u32, height: u32) -> Self {
        Self {
            width,
            depth,
            heights: vec![height; width as usize * depth as usize],
        }
    }

    /// Parse a height table: one row per map row (y ascending), comma or
    /// whitespace separated heights. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows: Vec<Vec<u32>> = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u32>().map_err(|e| Error::MapParse {
                        line: line_no + 1,
                        reason: format!("'{}': {}", s, e),
                    })
                })
                .collect::<Result<Vec<u32>>>()?;
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(Error::MapParse {
                        line: line_no + 1,
                        reason: format!("row has {} columns, expected {}", row.len(), first.len()),
                    });
                }
            }
            rows.push(row);
        }

        let depth = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len() as u32);
        Self::new(width, depth, rows.into_iter().flatten().collect())
    }

    /// Generate a heightmap from fractal noise
    pub fn from_noise(width: u32, depth: u32, params: &NoiseParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        let mut heights = Vec::with_capacity(width as usize * depth as usize);
        for y in 0..depth {
            for x in 0..width {
                let nx = (x as f32 / params.scale) as f64;
                let ny = (y as f32 / params.scale) as f64;
                // Noise in [-1, 1] mapped to [1, max_height]
                let normalized = ((noise.get([nx, ny]) + 1.0) / 2.0).clamp(0.0, 1.0);
                let h = (normalized * params.max_height as f64).round() as u32;
                heights.push(h.max(1));
            }
        }

        Self { width, depth, heights }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Tallest column in the map
    pub fn max_height(&self) -> u32 {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    /// Total number of occupied tiles
    pub fn tile_count(&self) -> usize {
        self.heights.iter().map(|&h| h as usize).sum()
    }

    /// Raw heights, row-major
    pub fn heights(&self) -> &[u32] {
        &self.heights
    }
}

/// Serialized heightmap form, checked through [`HeightMap::new`]
#[derive(Clone, Debug, Serialize, Deserialize)]
struct HeightMapDef {
    width: u32,
    depth: u32,
    heights: Vec<u32>,
}

impl TryFrom<HeightMapDef> for HeightMap {
    type Error = Error;

    fn try_from(def: HeightMapDef) -> Result<Self> {
        HeightMap::new(def.width, def.depth, def.heights)
    }
}

impl From<HeightMap> for HeightMapDef {
    fn from(map: HeightMap) -> Self {
        HeightMapDef {
            width: map.width,
            depth: map.depth,
            heights: map.heights,
        }
    }
}

impl HeightField for HeightMap {
    fn size(&self) -> (u32, u32) {
        (self.width, self.depth)
    }

    fn height(&self, x: i64, y: i64) -> u32 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.depth as i64 {
            return 0;
        }
        self.heights[(y * self.width as i64 + x) as usize]
    }
}

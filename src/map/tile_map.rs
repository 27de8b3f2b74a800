//! Tile map: heightmap plus the material of every occupied tile
//!
//! Text format (CSV-like):
//! ```text
//! width,depth
//! height,kind_0,kind_1,...   # one row per column, x inner, y outer
//! ```
//! Kinds not listed for a column default to stone wall.

use serde::{Deserialize, Serialize};

use super::height_map::{HeightField, HeightMap};
use crate::core::{Error, Result, TilePos};

/// Material of a tile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    StoneWall,
    Dirt,
    Gravel,
    RockyGround,
    Grass,
    Water,
    WoodenPlank,
}

impl TileKind {
    /// All kinds, in code order
    pub const ALL: [TileKind; 7] = [
        TileKind::StoneWall,
        TileKind::Dirt,
        TileKind::Gravel,
        TileKind::RockyGround,
        TileKind::Grass,
        TileKind::Water,
        TileKind::WoodenPlank,
    ];

    /// Numeric code used in map files
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Kind from its numeric map code
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Lower-case name, used for output file names
    pub fn name(self) -> &'static str {
        match self {
            TileKind::StoneWall => "stone_wall",
            TileKind::Dirt => "dirt",
            TileKind::Gravel => "gravel",
            TileKind::RockyGround => "rocky_ground",
            TileKind::Grass => "grass",
            TileKind::Water => "water",
            TileKind::WoodenPlank => "wooden_plank",
        }
    }
}

/// Heightmap with per-tile materials
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "TileMapDef", into = "TileMapDef")]
pub struct TileMap {
    heights: HeightMap,
    /// Per column, one kind per occupied z
    kinds: Vec<Vec<TileKind>>,
}

impl TileMap {
    /// Every tile of the heightmap gets the same kind
    pub fn uniform(heights: HeightMap, kind: TileKind) -> Self {
        let kinds = heights
            .heights()
            .iter()
            .map(|&h| vec![kind; h as usize])
            .collect();
        Self { heights, kinds }
    }

    /// Heightmap plus one kind list per column, each as long as its column
    pub fn new(heights: HeightMap, kinds: Vec<Vec<TileKind>>) -> Result<Self> {
        if kinds.len() != heights.heights().len() {
            return Err(Error::MapParse {
                line: 0,
                reason: format!("expected {} kind columns, got {}", heights.heights().len(), kinds.len()),
            });
        }
        for (i, (&h, column)) in heights.heights().iter().zip(&kinds).enumerate() {
            if column.len() != h as usize {
                return Err(Error::MapParse {
                    line: 0,
                    reason: format!("column {} has height {} but {} kinds", i, h, column.len()),
                });
            }
        }
        Ok(Self { heights, kinds })
    }

    /// Parse the CSV-like map format
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

        let (meta_line, meta) = lines.next().ok_or_else(|| Error::MapParse {
            line: 0,
            reason: "missing size header".to_string(),
        })?;
        let size = parse_row(meta_line, meta)?;
        let [width, depth] = size[..] else {
            return Err(Error::MapParse {
                line: meta_line,
                reason: format!("size header needs 2 values, got {}", size.len()),
            });
        };

        let columns = width as usize * depth as usize;
        let mut heights = Vec::with_capacity(columns);
        let mut kinds = Vec::with_capacity(columns);

        for (line_no, line) in lines {
            let row = parse_row(line_no, line)?;
            let Some((&height, codes)) = row.split_first() else {
                continue;
            };
            if codes.len() > height as usize {
                return Err(Error::MapParse {
                    line: line_no,
                    reason: format!("{} kinds for a column of height {}", codes.len(), height),
                });
            }
            let mut column = Vec::with_capacity(height as usize);
            for z in 0..height as usize {
                let kind = match codes.get(z) {
                    Some(&code) => TileKind::from_code(code).ok_or_else(|| Error::MapParse {
                        line: line_no,
                        reason: format!("unknown tile kind {} at z={}", code, z),
                    })?,
                    None => TileKind::default(),
                };
                column.push(kind);
            }
            heights.push(height);
            kinds.push(column);
        }

        if heights.len() != columns {
            return Err(Error::MapParse {
                line: 0,
                reason: format!("expected {} columns, got {}", columns, heights.len()),
            });
        }

        Self::new(HeightMap::new(width, depth, heights)?, kinds)
    }

    /// Serialize back to the text format
    pub fn to_text(&self) -> String {
        let (width, depth) = self.heights.size();
        let mut out = format!("{},{}\n", width, depth);
        for (h, column) in self.heights.heights().iter().zip(&self.kinds) {
            out.push_str(&h.to_string());
            for kind in column {
                out.push(',');
                out.push_str(&kind.code().to_string());
            }
            out.push('\n');
        }
        out
    }

    pub fn heights(&self) -> &HeightMap {
        &self.heights
    }

    /// Kind of the tile at (x, y, z), None when unoccupied
    pub fn kind_at(&self, x: i64, y: i64, z: i64) -> Option<TileKind> {
        let (width, depth) = self.heights.size();
        if x < 0 || y < 0 || z < 0 || x >= width as i64 || y >= depth as i64 {
            return None;
        }
        self.kinds[(y * width as i64 + x) as usize].get(z as usize).copied()
    }

    /// Kind of an occupied tile position
    pub fn kind(&self, pos: TilePos) -> Option<TileKind> {
        self.kind_at(pos.x as i64, pos.y as i64, pos.z as i64)
    }

    /// Distinct kinds present in the map, sorted
    pub fn kinds_present(&self) -> Vec<TileKind> {
        let mut present: Vec<TileKind> = self.kinds.iter().flatten().copied().collect();
        present.sort();
        present.dedup();
        present
    }
}

impl HeightField for TileMap {
    fn size(&self) -> (u32, u32) {
        self.heights.size()
    }

    fn height(&self, x: i64, y: i64) -> u32 {
        self.heights.height(x, y)
    }
}

/// Serialized tile map form, checked through [`TileMap::new`]
#[derive(Clone, Debug, Serialize, Deserialize)]
struct TileMapDef {
    heights: HeightMap,
    kinds: Vec<Vec<TileKind>>,
}

impl TryFrom<TileMapDef> for TileMap {
    type Error = Error;

    fn try_from(def: TileMapDef) -> Result<Self> {
        TileMap::new(def.heights, def.kinds)
    }
}

impl From<TileMap> for TileMapDef {
    fn from(map: TileMap) -> Self {
        TileMapDef {
            heights: map.heights,
            kinds: map.kinds,
        }
    }
}

fn parse_row(line_no: usize, line: &str) -> Result<Vec<u32>> {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|e| Error::MapParse {
                line: line_no,
                reason: format!("'{}': {}", s, e),
            })
        })
        .collect()
}

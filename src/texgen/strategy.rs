//! Brick connectivity strategy
//!
//! Builds one [`Brick`] from the heightmap and up to three already built
//! neighbors (-X, -Y, -Z). Each floor is scanned y outer, x inner. Every
//! voxel draws random +X/+Y/-Z joins, then reconciles them against the
//! neighbors it can see, so that each joined region ends up a single
//! uniformly colored brick with matching flags on both sides of every edge.
//!
//! The only write outside the brick under construction is the +Z flag on
//! the top floor of the brick below, returned as [`BelowJoins`] for the
//! cache to apply.

use super::brick::{Brick, Floor, FloorLevel};
use super::direction::{Dir8, Direction};
use super::random::{Draw, SpatialRandom, VoxelKey};
use super::voxel::{Connections, Occlusion, Voxel};
use crate::core::TilePos;
use crate::map::HeightField;
use crate::palette::Palette;

/// Probability that a random join is drawn
pub const CONNECT_PROBABILITY: f32 = 0.5;

/// Occlusion applied to a top-face edge facing a higher column
pub const OCCLUSION_STRENGTH: f32 = 0.6;

/// Default floor grid (cells per side)
pub const DEFAULT_GRID: (u32, u32) = (4, 4);

/// Height deltas `height(neighbor) - (z + 1)` to the 8 planar neighbors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeightDiff([i64; 8]);

impl HeightDiff {
    pub fn compute(map: &dyn HeightField, pos: TilePos) -> Self {
        let (x, y) = (pos.x as i64, pos.y as i64);
        let level = pos.z as i64 + 1;
        let mut diffs = [0i64; 8];
        for dir in Dir8::ALL {
            let o = dir.offset();
            diffs[dir.index()] = map.height(x + o.x as i64, y + o.y as i64) as i64 - level;
        }
        Self(diffs)
    }

    pub fn get(&self, dir: Dir8) -> i64 {
        self.0[dir.index()]
    }
}

/// Planar edges where the neighboring tile has a different material.
///
/// Bricks never join across a material change, so these edges are treated
/// like the end of the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaterialSeams {
    pub east: bool,
    pub north: bool,
}

/// Already built neighbors a brick may reconcile against
#[derive(Clone, Copy, Debug, Default)]
pub struct BrickNeighbors<'a> {
    pub neg_x: Option<&'a Brick>,
    pub neg_y: Option<&'a Brick>,
    pub neg_z: Option<&'a Brick>,
}

/// Everything needed to build one brick
#[derive(Clone, Copy)]
pub struct BrickContext<'a> {
    pub map: &'a dyn HeightField,
    pub pos: TilePos,
    pub palette: &'a Palette,
    pub neighbors: BrickNeighbors<'a>,
    pub seams: MaterialSeams,
}

impl<'a> BrickContext<'a> {
    pub fn new(map: &'a dyn HeightField, pos: TilePos, palette: &'a Palette) -> Self {
        Self {
            map,
            pos,
            palette,
            neighbors: BrickNeighbors::default(),
            seams: MaterialSeams::default(),
        }
    }

    pub fn with_neighbors(mut self, neighbors: BrickNeighbors<'a>) -> Self {
        self.neighbors = neighbors;
        self
    }

    pub fn with_seams(mut self, seams: MaterialSeams) -> Self {
        self.seams = seams;
        self
    }

    /// Linear tile index `x + y * W + z * W * H`
    pub fn tile_index(&self) -> u64 {
        let (w, d) = self.map.size();
        self.pos.x as u64 + self.pos.y as u64 * w as u64 + self.pos.z as u64 * w as u64 * d as u64
    }
}

/// Tile-level flags derived from terrain geometry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileFlags {
    /// No brick may continue past this tile in +X
    pub is_last_x: bool,
    /// No brick may continue past this tile in +Y
    pub is_last_y: bool,
    /// +X column ends level with this tile, so the top floor closes there
    pub should_split_x: bool,
    pub should_split_y: bool,
    /// A -X or -Y column ends one below, so floors must not join vertically
    pub should_split_z: bool,
    /// Uppermost tile of its column
    pub is_toppest: bool,
}

impl TileFlags {
    pub fn compute(map: &dyn HeightField, pos: TilePos, diff: &HeightDiff, seams: MaterialSeams) -> Self {
        let (width, depth) = map.size();
        Self {
            is_last_x: pos.x + 1 >= width
                || diff.get(Dir8::E) < 0
                || diff.get(Dir8::SE) >= 0
                || seams.east,
            is_last_y: pos.y + 1 >= depth
                || diff.get(Dir8::N) < 0
                || diff.get(Dir8::NE) >= 0
                || seams.north,
            should_split_x: diff.get(Dir8::E) == 0,
            should_split_y: diff.get(Dir8::N) == 0,
            should_split_z: diff.get(Dir8::S) == -1 || diff.get(Dir8::W) == -1,
            is_toppest: pos.z as i64 + 1 == map.height(pos.x as i64, pos.y as i64) as i64,
        }
    }
}

/// Cells of the -Z brick's top floor that were joined from above
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BelowJoins {
    cells: Vec<(u32, u32)>,
}

impl BelowJoins {
    pub fn cells(&self) -> &[(u32, u32)] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Set +Z on every joined cell of `below`'s top floor
    pub fn apply(&self, below: &mut Brick) {
        apply_up_joins(&mut below.top, &self.cells);
    }
}

/// Result of building one brick
#[derive(Clone, Debug)]
pub struct BrickBuild {
    pub brick: Brick,
    pub below_joins: BelowJoins,
}

/// Per-floor build inputs
struct FloorPlan<'b> {
    level: FloorLevel,
    neg_x: Option<&'b Floor>,
    neg_y: Option<&'b Floor>,
    neg_z: Option<&'b Floor>,
    is_last_x: bool,
    is_last_y: bool,
    should_split_z: bool,
    toppest: bool,
}

/// Stone-wall style connectivity strategy
#[derive(Clone, Debug)]
pub struct BrickStrategy {
    rng: SpatialRandom,
    grid: (u32, u32),
    connect_probability: f32,
    occlusion_strength: f32,
}

impl BrickStrategy {
    pub fn new(rng: SpatialRandom) -> Self {
        Self {
            rng,
            grid: DEFAULT_GRID,
            connect_probability: CONNECT_PROBABILITY,
            occlusion_strength: OCCLUSION_STRENGTH,
        }
    }

    /// Floor grid size in cells
    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.grid = (width.max(1), height.max(1));
        self
    }

    pub fn with_occlusion_strength(mut self, strength: f32) -> Self {
        self.occlusion_strength = strength.clamp(0.0, 1.0);
        self
    }

    pub fn with_connect_probability(mut self, p: f32) -> Self {
        self.connect_probability = p.clamp(0.0, 1.0);
        self
    }

    pub fn grid(&self) -> (u32, u32) {
        self.grid
    }

    /// Build the brick for `ctx.pos`. Total for any input; the caller is
    /// responsible for only asking for occupied tiles in scan order.
    pub fn create_brick(&self, ctx: &BrickContext) -> BrickBuild {
        let diff = HeightDiff::compute(ctx.map, ctx.pos);
        let flags = TileFlags::compute(ctx.map, ctx.pos, &diff, ctx.seams);
        let tile_index = ctx.tile_index();
        let n = ctx.neighbors;

        let (bottom, below_cells) = self.build_floor(
            ctx,
            tile_index,
            &FloorPlan {
                level: FloorLevel::Bottom,
                neg_x: n.neg_x.map(|b| &b.bottom),
                neg_y: n.neg_y.map(|b| &b.bottom),
                neg_z: n.neg_z.map(|b| &b.top),
                is_last_x: flags.is_last_x,
                is_last_y: flags.is_last_y,
                should_split_z: flags.should_split_z,
                toppest: false,
            },
            &diff,
        );

        let (top, bottom_cells) = self.build_floor(
            ctx,
            tile_index,
            &FloorPlan {
                level: FloorLevel::Top,
                neg_x: n.neg_x.map(|b| &b.top),
                neg_y: n.neg_y.map(|b| &b.top),
                neg_z: Some(&bottom),
                is_last_x: flags.is_last_x || flags.should_split_x,
                is_last_y: flags.is_last_y || flags.should_split_y,
                should_split_z: flags.is_toppest,
                toppest: flags.is_toppest,
            },
            &diff,
        );

        let mut bottom = bottom;
        apply_up_joins(&mut bottom, &bottom_cells);

        BrickBuild {
            brick: Brick::new(top, bottom),
            below_joins: BelowJoins { cells: below_cells },
        }
    }

    fn build_floor(
        &self,
        ctx: &BrickContext,
        tile_index: u64,
        plan: &FloorPlan,
        diff: &HeightDiff,
    ) -> (Floor, Vec<(u32, u32)>) {
        use Direction::*;

        let (w, h) = self.grid;
        let p = self.connect_probability;
        let mut floor = Floor::new(w, h);
        let mut up_joins = Vec::new();

        for vy in 0..h {
            for vx in 0..w {
                let cell = floor.cell(vx, vy);
                let key = |draw| VoxelKey::new(tile_index, plan.level, cell, draw);

                let nx = if vx > 0 {
                    Some(*floor.get(vx - 1, vy))
                } else {
                    plan.neg_x.map(|f| *f.get(w - 1, vy))
                };
                let ny = if vy > 0 {
                    Some(*floor.get(vx, vy - 1))
                } else {
                    plan.neg_y.map(|f| *f.get(vx, h - 1))
                };
                let nz = plan.neg_z.map(|f| *f.get(vx, vy));

                let mut connected_nx = nx.is_some_and(|v| v.connected(PX));
                let mut connected_ny = ny.is_some_and(|v| v.connected(PY));

                let mut px = !(plan.is_last_x && vx == w - 1) && self.rng.chance(key(Draw::ConnectX), p);
                let mut py = !(plan.is_last_y && vy == h - 1) && self.rng.chance(key(Draw::ConnectY), p);
                let mut nz_join = match nz {
                    Some(below)
                        if !plan.should_split_z
                            && !below.connected(NZ)
                            && below.connected(NX) == connected_nx
                            && below.connected(NY) == connected_ny =>
                    {
                        self.rng.chance(key(Draw::ConnectZ), p)
                    }
                    _ => false,
                };
                let mut color = ctx.palette.pick(self.rng.value(key(Draw::Color)));

                let left = nx.filter(|_| connected_nx);
                let down = ny.filter(|_| connected_ny);
                match (left, down) {
                    (Some(left), Some(down)) if left.connected(NY) && down.connected(NX) => {
                        // Fourth corner of a 2x2 block
                        px = false;
                        py = false;
                        nz_join = left.connected(NZ);
                        color = left.color;
                    }
                    (Some(left), Some(down)) => {
                        // Joined to two bricks that are not joined to each other.
                        // Keep one and retract the other, always retracting an
                        // edge inside this floor.
                        if vx > 0 {
                            floor.get_mut(vx - 1, vy).connection.set(PX, false);
                            connected_nx = false;
                            px = down.connected(PX);
                            py = false;
                            nz_join = down.connected(NZ);
                            color = down.color;
                        } else {
                            if vy > 0 {
                                floor.get_mut(vx, vy - 1).connection.set(PY, false);
                            } else {
                                log::warn!(
                                    "Tile {} {:?} floor: -X and -Y bricks both join cell (0, 0)",
                                    ctx.pos,
                                    plan.level
                                );
                            }
                            connected_ny = false;
                            px = false;
                            py = left.connected(PY);
                            nz_join = left.connected(NZ);
                            color = left.color;
                        }
                    }
                    (Some(left), None) => {
                        px = false;
                        py = left.connected(PY);
                        nz_join = left.connected(NZ);
                        color = left.color;
                    }
                    (None, Some(down)) => {
                        px = down.connected(PX);
                        py = false;
                        nz_join = down.connected(NZ);
                        color = down.color;
                    }
                    (None, None) => {}
                }

                match nz {
                    Some(below) if nz_join && !plan.should_split_z => {
                        px = below.connected(PX);
                        py = below.connected(PY);
                        color = below.color;
                        up_joins.push((vx, vy));
                    }
                    _ => nz_join = false,
                }

                if plan.is_last_x && vx == w - 1 {
                    px = false;
                }
                if plan.is_last_y && vy == h - 1 {
                    py = false;
                }

                let connection = Connections::NONE
                    .with(PX, px)
                    .with(NX, connected_nx)
                    .with(PY, py)
                    .with(NY, connected_ny)
                    .with(NZ, nz_join);

                let occlusion = if plan.toppest {
                    self.edge_occlusion(vx, vy, diff)
                } else {
                    Occlusion::NONE
                };

                floor.set(vx, vy, Voxel { color, connection, occlusion });
            }
        }

        (floor, up_joins)
    }

    /// Occlusion of a top-floor voxel of the uppermost tile.
    ///
    /// Edge voxels facing a higher column are darkened on that side. A corner
    /// facing a higher diagonal column is darkened only when both adjacent
    /// sides are open.
    fn edge_occlusion(&self, vx: u32, vy: u32, diff: &HeightDiff) -> Occlusion {
        let (w, h) = self.grid;
        let s = self.occlusion_strength;
        let higher = |d: Dir8| diff.get(d) > 0;
        let mut occ = Occlusion::NONE;

        let east = vx == w - 1;
        let west = vx == 0;
        let north = vy == h - 1;
        let south = vy == 0;

        if east && higher(Dir8::E) {
            occ.set(Direction::PX, s);
        }
        if west && higher(Dir8::W) {
            occ.set(Direction::NX, s);
        }
        if north && higher(Dir8::N) {
            occ.set(Direction::PY, s);
        }
        if south && higher(Dir8::S) {
            occ.set(Direction::NY, s);
        }

        let corners = [
            (east && north, Dir8::NE, Dir8::E, Dir8::N, Direction::PX, Direction::PY),
            (west && north, Dir8::NW, Dir8::W, Dir8::N, Direction::NX, Direction::PY),
            (east && south, Dir8::SE, Dir8::E, Dir8::S, Direction::PX, Direction::NY),
            (west && south, Dir8::SW, Dir8::W, Dir8::S, Direction::NX, Direction::NY),
        ];
        for (at_corner, diag, side_a, side_b, face_a, face_b) in corners {
            if at_corner && higher(diag) && !higher(side_a) && !higher(side_b) {
                occ.set(face_a, s);
                occ.set(face_b, s);
            }
        }

        occ.set(Direction::PZ, occ.max_planar());
        occ
    }
}

fn apply_up_joins(floor: &mut Floor, cells: &[(u32, u32)]) {
    for &(x, y) in cells {
        floor.get_mut(x, y).connection.set(Direction::PZ, true);
    }
}

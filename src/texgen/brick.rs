//! Two-floor brick: the connectivity state of one map tile

use super::voxel::Voxel;

/// Which half of a tile a floor covers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloorLevel {
    Top,
    Bottom,
}

impl FloorLevel {
    /// Generation order: bottom first, since the top floor stacks on it
    pub const BUILD_ORDER: [FloorLevel; 2] = [FloorLevel::Bottom, FloorLevel::Top];

    /// Raster order: top floor is the upper band of a side face
    pub const RASTER_ORDER: [FloorLevel; 2] = [FloorLevel::Top, FloorLevel::Bottom];

    pub const fn index(self) -> u32 {
        match self {
            FloorLevel::Top => 0,
            FloorLevel::Bottom => 1,
        }
    }
}

/// Grid of voxels covering one floor, `(x, y)` with x east and y north
#[derive(Clone, Debug, PartialEq)]
pub struct Floor {
    width: u32,
    height: u32,
    voxels: Vec<Voxel>,
}

impl Floor {
    /// Floor filled with default (unjoined, black) voxels
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Voxel::default())
    }

    pub fn filled(width: u32, height: u32, voxel: Voxel) -> Self {
        Self {
            width,
            height,
            voxels: vec![voxel; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y * self.width + x) as usize
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Linear cell index, row-major
    pub fn cell(&self, x: u32, y: u32) -> u32 {
        y * self.width + x
    }

    pub fn get(&self, x: u32, y: u32) -> &Voxel {
        &self.voxels[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> &mut Voxel {
        let idx = self.index(x, y);
        &mut self.voxels[idx]
    }

    pub fn set(&mut self, x: u32, y: u32, voxel: Voxel) {
        let idx = self.index(x, y);
        self.voxels[idx] = voxel;
    }

    /// Voxels in row-major order
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Iterate `(x, y, voxel)`
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &Voxel)> {
        let width = self.width;
        self.voxels
            .iter()
            .enumerate()
            .map(move |(i, v)| (i as u32 % width, i as u32 / width, v))
    }
}

/// Connectivity state for one tile, split into two horizontal floors
#[derive(Clone, Debug, PartialEq)]
pub struct Brick {
    pub top: Floor,
    pub bottom: Floor,
}

impl Brick {
    pub fn new(top: Floor, bottom: Floor) -> Self {
        debug_assert_eq!((top.width, top.height), (bottom.width, bottom.height));
        Self { top, bottom }
    }

    /// Brick with both floors filled by the same voxel
    pub fn filled(width: u32, height: u32, voxel: Voxel) -> Self {
        Self {
            top: Floor::filled(width, height, voxel),
            bottom: Floor::filled(width, height, voxel),
        }
    }

    pub fn floor(&self, level: FloorLevel) -> &Floor {
        match level {
            FloorLevel::Top => &self.top,
            FloorLevel::Bottom => &self.bottom,
        }
    }

    pub fn floor_mut(&mut self, level: FloorLevel) -> &mut Floor {
        match level {
            FloorLevel::Top => &mut self.top,
            FloorLevel::Bottom => &mut self.bottom,
        }
    }

    /// Grid size of each floor as (width, height)
    pub fn grid_size(&self) -> (u32, u32) {
        (self.top.width, self.top.height)
    }
}

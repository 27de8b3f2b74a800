//! Texture rasterizer: brick voxel grids to flat pixel buffers
//!
//! Each voxel expands to a `cell_px` square block. A cell draws its own west
//! and south grid lines (top face) or its right and bottom lines (side
//! faces) wherever the matching connection flag is false, so two joined
//! voxels never have a line between them.
//!
//! Image rows run top to bottom: north is up on the top face, and on side
//! faces the TOP floor is the upper band.

use bytemuck::cast_slice;
use image::{RgbImage, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::brick::{Brick, FloorLevel};
use super::cache::BrickCache;
use super::direction::Direction;
use super::voxel::Voxel;
use crate::core::{Error, Result, TilePos};
use crate::palette::Rgb;

/// Displacement value marking a cell interior (bevel mask)
const BEVEL: u8 = 255;

/// Pixel layout of tile textures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureLayout {
    /// Side of one voxel cell in pixels
    pub cell_px: u32,
    /// Top face grid in cells
    pub top_cells: (u32, u32),
    /// Side face grid in cells; the rows are the two floors
    pub side_cells: (u32, u32),
}

impl Default for TextureLayout {
    fn default() -> Self {
        Self {
            cell_px: 4,
            top_cells: (4, 4),
            side_cells: (4, 2),
        }
    }
}

impl TextureLayout {
    /// Check the layout is one a brick can be rasterized into
    pub fn validate(&self) -> Result<()> {
        if self.cell_px == 0 {
            return Err(Error::InvalidLayout("cell_px must be at least 1".to_string()));
        }
        let (tw, th) = self.top_cells;
        if tw == 0 || th == 0 {
            return Err(Error::InvalidLayout(format!("empty top grid {}x{}", tw, th)));
        }
        if tw != th {
            // Side faces walk both axes, so they only share a width on square grids
            return Err(Error::InvalidLayout(format!("top grid {}x{} is not square", tw, th)));
        }
        if self.side_cells.0 != tw {
            return Err(Error::InvalidLayout(format!(
                "side width {} does not match top grid width {}",
                self.side_cells.0, tw
            )));
        }
        if self.side_cells.1 != 2 {
            return Err(Error::InvalidLayout(format!(
                "side faces need 2 rows (one per floor), got {}",
                self.side_cells.1
            )));
        }
        Ok(())
    }

    /// Top face size in pixels
    pub fn top_size(&self) -> (u32, u32) {
        (self.top_cells.0 * self.cell_px, self.top_cells.1 * self.cell_px)
    }

    /// Side face size in pixels
    pub fn side_size(&self) -> (u32, u32) {
        (self.side_cells.0 * self.cell_px, self.side_cells.1 * self.cell_px)
    }

    /// Size of the texture for a face direction
    pub fn face_size(&self, face: Direction) -> (u32, u32) {
        if face.is_planar() { self.side_size() } else { self.top_size() }
    }
}

/// Per-face pixel buffers, row-major `x + y * width`
#[derive(Clone, Debug, PartialEq)]
pub struct TexturePack {
    pub width: u32,
    pub height: u32,
    pub albedo: Vec<Rgb>,
    /// Cell-interior bevel mask
    pub displacement: Vec<Rgb>,
    /// RGBA normals, zero-filled
    pub normal: Vec<[f32; 4]>,
    /// Per-pixel ambient occlusion from the voxel's face occlusion
    pub occlusion: Vec<f32>,
    /// Uniform opacity, 255 for solid tiles
    pub alpha: u8,
}

impl TexturePack {
    /// Blank pack: black albedo, zero maps, opaque
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            albedo: vec![Rgb::BLACK; len],
            displacement: vec![Rgb::BLACK; len],
            normal: vec![[0.0; 4]; len],
            occlusion: vec![0.0; len],
            alpha: 255,
        }
    }

    /// Pack filled with one color
    pub fn solid(width: u32, height: u32, color: Rgb, alpha: u8) -> Self {
        let mut pack = Self::new(width, height);
        pack.albedo.fill(color);
        pack.alpha = alpha;
        pack
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.albedo[self.index(x, y)]
    }

    /// Albedo as raw RGB bytes, ready for upload
    pub fn albedo_bytes(&self) -> &[u8] {
        cast_slice(&self.albedo)
    }

    pub fn displacement_bytes(&self) -> &[u8] {
        cast_slice(&self.displacement)
    }

    /// Normals as raw f32 components
    pub fn normal_floats(&self) -> &[f32] {
        cast_slice(&self.normal)
    }

    /// Number of albedo pixels with the given color
    pub fn count_color(&self, color: Rgb) -> usize {
        self.albedo.iter().filter(|&&c| c == color).count()
    }

    pub fn to_albedo_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| image::Rgb(self.pixel(x, y).0))
    }

    /// Albedo with the pack's alpha
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [r, g, b] = self.pixel(x, y).0;
            image::Rgba([r, g, b, self.alpha])
        })
    }

    pub fn to_displacement_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(self.displacement[self.index(x, y)].0)
        })
    }

    /// Albedo darkened by the occlusion map
    pub fn shaded_albedo(&self) -> Vec<Rgb> {
        self.albedo
            .iter()
            .zip(&self.occlusion)
            .map(|(&c, &o)| c.darken(1.0 - o))
            .collect()
    }
}

/// Top face plus the four side faces of one tile
#[derive(Clone, Debug, PartialEq)]
pub struct BrickTextures {
    pub top: TexturePack,
    /// Indexed like [`Direction::PLANAR`]
    pub sides: [TexturePack; 4],
}

impl BrickTextures {
    pub fn face(&self, face: Direction) -> &TexturePack {
        match face {
            Direction::PX => &self.sides[0],
            Direction::NX => &self.sides[1],
            Direction::PY => &self.sides[2],
            Direction::NY => &self.sides[3],
            Direction::PZ | Direction::NZ => &self.top,
        }
    }
}

/// Turns bricks into texture packs
#[derive(Clone, Debug)]
pub struct TextureRasterizer {
    layout: TextureLayout,
    outline: Rgb,
}

impl TextureRasterizer {
    pub fn new(layout: TextureLayout, outline: Rgb) -> Result<Self> {
        layout.validate()?;
        Ok(Self { layout, outline })
    }

    pub fn layout(&self) -> &TextureLayout {
        &self.layout
    }

    pub fn outline(&self) -> Rgb {
        self.outline
    }

    /// Rasterize one face. +Z and -Z both use the top floor.
    pub fn rasterize(&self, brick: &Brick, face: Direction) -> TexturePack {
        if face.is_planar() {
            self.rasterize_side(brick, face)
        } else {
            self.rasterize_top(brick)
        }
    }

    pub fn rasterize_top(&self, brick: &Brick) -> TexturePack {
        let cell = self.layout.cell_px;
        let (gw, gh) = brick.grid_size();
        let mut pack = TexturePack::new(gw * cell, gh * cell);

        for ty in 0..pack.height {
            for tx in 0..pack.width {
                let (off_x, off_y) = (tx % cell, ty % cell);
                let voxel = brick.top.get(tx / cell, gh - ty / cell - 1);
                let line = (off_x == 0 && !voxel.connected(Direction::NX))
                    || (off_y == cell - 1 && !voxel.connected(Direction::NY));
                self.paint(&mut pack, tx, ty, voxel, line, Direction::PZ, off_x, off_y);
            }
        }
        pack
    }

    pub fn rasterize_side(&self, brick: &Brick, face: Direction) -> TexturePack {
        let cell = self.layout.cell_px;
        let (gw, gh) = brick.grid_size();
        let edge_len = if matches!(face, Direction::PX | Direction::NX) { gh } else { gw };
        let mut pack = TexturePack::new(edge_len * cell, 2 * cell);

        for (band, level) in FloorLevel::RASTER_ORDER.into_iter().enumerate() {
            let floor = brick.floor(level);
            // Edge voxels left to right as seen from outside, with the flag
            // that closes each one's right edge
            let edge: Vec<(&Voxel, Direction)> = (0..edge_len)
                .map(|i| match face {
                    Direction::PX => (floor.get(gw - 1, i), Direction::PY),
                    Direction::NX => (floor.get(0, gh - 1 - i), Direction::NY),
                    Direction::PY => (floor.get(gw - 1 - i, gh - 1), Direction::NX),
                    _ => (floor.get(i, 0), Direction::PX),
                })
                .collect();

            for row in 0..cell {
                let ty = band as u32 * cell + row;
                for tx in 0..pack.width {
                    let off_x = tx % cell;
                    let (voxel, right) = edge[(tx / cell) as usize];
                    let line = (off_x == cell - 1 && !voxel.connected(right))
                        || (row == cell - 1 && !voxel.connected(Direction::NZ));
                    self.paint(&mut pack, tx, ty, voxel, line, face, off_x, row);
                }
            }
        }
        pack
    }

    #[allow(clippy::too_many_arguments)]
    fn paint(
        &self,
        pack: &mut TexturePack,
        tx: u32,
        ty: u32,
        voxel: &Voxel,
        line: bool,
        face: Direction,
        off_x: u32,
        off_y: u32,
    ) {
        let cell = self.layout.cell_px;
        let i = pack.index(tx, ty);
        pack.albedo[i] = if line { self.outline } else { voxel.color };
        pack.occlusion[i] = voxel.occlusion.get(face);
        if off_x > 0 && off_x + 1 < cell && off_y > 0 && off_y + 1 < cell {
            pack.displacement[i] = Rgb::new(BEVEL, BEVEL, BEVEL);
        }
    }

    /// Top face and all four side faces
    pub fn rasterize_brick(&self, brick: &Brick) -> BrickTextures {
        BrickTextures {
            top: self.rasterize_top(brick),
            sides: Direction::PLANAR.map(|face| self.rasterize_side(brick, face)),
        }
    }

    /// Rasterize every brick of a finished cache in parallel, sorted by
    /// linear tile index
    pub fn rasterize_cache(&self, cache: &BrickCache) -> Vec<(TilePos, BrickTextures)> {
        let mut out: Vec<(usize, BrickTextures)> = cache
            .raw()
            .par_iter()
            .map(|(&index, brick)| (index, self.rasterize_brick(brick)))
            .collect();
        out.sort_unstable_by_key(|(index, _)| *index);
        out.into_iter()
            .map(|(index, textures)| (cache.pos_of(index), textures))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UVec3;
    use crate::map::HeightMap;
    use crate::palette::Palette;
    use crate::texgen::generator::BrickGenerator;
    use crate::texgen::random::SpatialRandom;
    use crate::texgen::voxel::Connections;

    fn rasterizer() -> TextureRasterizer {
        TextureRasterizer::new(TextureLayout::default(), Rgb::BLACK).unwrap()
    }

    #[test]
    fn test_layout_validation() {
        assert!(TextureLayout::default().validate().is_ok());
        let bad = [
            TextureLayout { cell_px: 0, ..Default::default() },
            TextureLayout { top_cells: (4, 3), ..Default::default() },
            TextureLayout { side_cells: (3, 2), ..Default::default() },
            TextureLayout { side_cells: (4, 3), ..Default::default() },
        ];
        for layout in bad {
            assert!(matches!(layout.validate(), Err(Error::InvalidLayout(_))), "{:?}", layout);
        }
        assert!(TextureRasterizer::new(bad[0], Rgb::BLACK).is_err());
    }

    #[test]
    fn test_layout_serde() {
        let json = serde_json::to_string(&TextureLayout::default()).unwrap();
        let back: TextureLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TextureLayout::default());
    }

    #[test]
    fn test_canonical_sizes() {
        let layout = TextureLayout::default();
        assert_eq!(layout.top_size(), (16, 16));
        assert_eq!(layout.side_size(), (16, 8));
        assert_eq!(layout.face_size(Direction::NY), (16, 8));
        assert_eq!(layout.face_size(Direction::PZ), (16, 16));

        let brick = Brick::filled(4, 4, Voxel::default());
        let textures = rasterizer().rasterize_brick(&brick);
        assert_eq!((textures.top.width, textures.top.height), (16, 16));
        for side in &textures.sides {
            assert_eq!((side.width, side.height), (16, 8));
            assert_eq!(side.albedo.len(), 128);
            assert_eq!(side.albedo_bytes().len(), 384);
            assert_eq!(side.normal_floats().len(), 512);
        }
    }

    #[test]
    fn test_all_connected_has_no_outline() {
        let color = Rgb::new(0x60, 0x5c, 0x52);
        let brick = Brick::filled(4, 4, Voxel::new(color, Connections::ALL));
        let r = rasterizer();
        let top = r.rasterize_top(&brick);
        assert_eq!(top.count_color(Rgb::BLACK), 0);
        assert_eq!(top.count_color(color), 256);
        for face in Direction::PLANAR {
            assert_eq!(r.rasterize_side(&brick, face).count_color(Rgb::BLACK), 0);
        }
    }

    #[test]
    fn test_unconnected_grid_lines() {
        let color = Rgb::WHITE;
        let brick = Brick::filled(4, 4, Voxel::new(color, Connections::NONE));
        let r = rasterizer();
        let top = r.rasterize_top(&brick);
        // Each 4x4 cell: left column plus bottom row = 7 outline pixels
        assert_eq!(top.count_color(Rgb::BLACK), 16 * 7);
        assert_eq!(top.pixel(0, 0), Rgb::BLACK);
        assert_eq!(top.pixel(1, 0), color);
        assert_eq!(top.pixel(1, 3), Rgb::BLACK);

        let side = r.rasterize_side(&brick, Direction::PX);
        // Each cell per band: right column plus bottom row = 7 outline pixels
        assert_eq!(side.count_color(Rgb::BLACK), 8 * 7);
        assert_eq!(side.pixel(3, 0), Rgb::BLACK);
        assert_eq!(side.pixel(0, 3), Rgb::BLACK);
        assert_eq!(side.pixel(0, 0), color);
    }

    #[test]
    fn test_top_orientation() {
        // North-west voxel lands in the image's top-left cell
        let mut brick = Brick::filled(4, 4, Voxel::new(Rgb::WHITE, Connections::ALL));
        let red = Rgb::new(255, 0, 0);
        brick.top.get_mut(0, 3).color = red;
        let top = rasterizer().rasterize_top(&brick);
        assert_eq!(top.pixel(1, 1), red);
        assert_eq!(top.pixel(1, 13), Rgb::WHITE);
    }

    #[test]
    fn test_side_edge_rows() {
        let mut brick = Brick::filled(4, 4, Voxel::new(Rgb::WHITE, Connections::ALL));
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        // South-east corner of the top floor, north-west of the bottom
        brick.top.get_mut(3, 0).color = red;
        brick.bottom.get_mut(0, 3).color = blue;
        let r = rasterizer();

        // +X walks y ascending: SE corner is the leftmost cell
        let px = r.rasterize_side(&brick, Direction::PX);
        assert_eq!(px.pixel(1, 1), red);
        // -Y walks x ascending: SE corner is the rightmost cell
        let ny = r.rasterize_side(&brick, Direction::NY);
        assert_eq!(ny.pixel(13, 1), red);
        // -X walks y descending: NW corner is the leftmost cell, bottom band
        let nx = r.rasterize_side(&brick, Direction::NX);
        assert_eq!(nx.pixel(1, 5), blue);
        // +Y walks x descending: NW corner is the rightmost cell
        let py = r.rasterize_side(&brick, Direction::PY);
        assert_eq!(py.pixel(13, 5), blue);
    }

    #[test]
    fn test_side_right_edge_flags() {
        // Leftmost top-floor cell of each face and the flag closing its right edge
        let cases = [
            (Direction::PX, (3, 0), Direction::PY),
            (Direction::NX, (0, 3), Direction::NY),
            (Direction::PY, (3, 3), Direction::NX),
            (Direction::NY, (0, 0), Direction::PX),
        ];
        let r = rasterizer();
        for (face, (x, y), closing) in cases {
            let mut brick = Brick::filled(4, 4, Voxel::new(Rgb::WHITE, Connections::ALL));
            brick.top.get_mut(x, y).connection.set(closing, false);
            let pack = r.rasterize_side(&brick, face);
            assert_eq!(pack.pixel(3, 1), Rgb::BLACK, "{:?} not closed by {:?}", face, closing);
            assert_eq!(pack.pixel(2, 1), Rgb::WHITE);
            assert_eq!(pack.count_color(Rgb::BLACK), 4, "{:?}", face);

            // Any other planar flag leaves the right edge open
            for other in Direction::PLANAR.into_iter().filter(|&d| d != closing) {
                let mut brick = Brick::filled(4, 4, Voxel::new(Rgb::WHITE, Connections::ALL));
                brick.top.get_mut(x, y).connection.set(other, false);
                let pack = r.rasterize_side(&brick, face);
                assert_eq!(pack.pixel(3, 1), Rgb::WHITE, "{:?} closed by {:?}", face, other);
            }
        }
    }

    #[test]
    fn test_bevel_and_occlusion_maps() {
        let mut brick = Brick::filled(4, 4, Voxel::new(Rgb::WHITE, Connections::ALL));
        brick.top.get_mut(0, 3).occlusion.set(Direction::PZ, 0.6);
        let top = rasterizer().rasterize_top(&brick);
        assert_eq!(top.displacement[top.index(1, 1)], Rgb::new(255, 255, 255));
        assert_eq!(top.displacement[top.index(0, 0)], Rgb::BLACK);
        assert_eq!(top.occlusion[top.index(2, 2)], 0.6);
        assert_eq!(top.occlusion[top.index(6, 6)], 0.0);
        let shaded = top.shaded_albedo();
        assert_eq!(shaded[top.index(2, 2)], Rgb::WHITE.darken(0.4));
    }

    #[test]
    fn test_images() {
        let pack = TexturePack::solid(16, 8, Rgb::new(1, 2, 3), 128);
        let rgba = pack.to_rgba_image();
        assert_eq!(rgba.dimensions(), (16, 8));
        assert_eq!(rgba.get_pixel(5, 5).0, [1, 2, 3, 128]);
        assert_eq!(pack.to_albedo_image().get_pixel(0, 0).0, [1, 2, 3]);
    }

    #[test]
    fn test_two_tile_seam_agrees() {
        let map = HeightMap::flat(2, 1, 1);
        let palette = Palette::stone_brick();
        let outline = palette.outline();
        for seed in 0..20 {
            let mut generator = BrickGenerator::new(&map, palette.clone(), SpatialRandom::new(seed));
            generator.generate_at(UVec3::new(0, 0, 0)).unwrap();
            generator.generate_at(UVec3::new(1, 0, 0)).unwrap();
            let cache = generator.cache();
            let west = cache.get(UVec3::new(0, 0, 0)).unwrap();
            let east = cache.get(UVec3::new(1, 0, 0)).unwrap();

            for level in FloorLevel::RASTER_ORDER {
                for y in 0..4 {
                    assert_eq!(
                        west.floor(level).get(3, y).connected(Direction::PX),
                        east.floor(level).get(0, y).connected(Direction::NX)
                    );
                }
            }

            let r = rasterizer();
            let west_south = r.rasterize_side(west, Direction::NY);
            let east_top = r.rasterize_top(east);
            // West tile's south face draws the seam on its rightmost column;
            // the east tile's top face draws it on its leftmost column.
            let seam_on_side = west_south.pixel(15, 0) == outline;
            let seam_on_top = east_top.pixel(0, 12) == outline;
            assert_eq!(seam_on_side, seam_on_top, "one-sided seam with seed {}", seed);
            assert_eq!(seam_on_side, !west.top.get(3, 0).connected(Direction::PX));
            // Bottom band of the same column
            let lower_seam = west_south.pixel(15, 4) == outline;
            assert_eq!(lower_seam, !east.bottom.get(0, 0).connected(Direction::NX));
        }
    }

    #[test]
    fn test_rasterize_cache_parallel() {
        let map = HeightMap::flat(3, 2, 2);
        let mut generator = BrickGenerator::new(&map, Palette::sweetie16(), SpatialRandom::new(5));
        generator.generate_all().unwrap();
        let cache = generator.cache();
        let r = rasterizer();
        let textures = r.rasterize_cache(cache);
        assert_eq!(textures.len(), 12);
        assert_eq!(textures[0].0, UVec3::ZERO);
        for (pos, tex) in &textures {
            assert_eq!(*tex, r.rasterize_brick(cache.get(*pos).unwrap()));
        }
    }
}

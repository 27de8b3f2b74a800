//! Palette lookup tables for post-process palette mapping and dithering
//!
//! A LUT maps every 4-bit-per-channel RGB color (4096 entries, laid out as a
//! 64x64 texture) to its nearest palette color. A second table holds, for
//! each nearest color, the closest *other* palette color, which an ordered
//! dither alternates with.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbImage;

use super::{Palette, Rgb};

/// Side length of the LUT texture
pub const LUT_WIDTH: u32 = 64;

/// Number of quantized colors (16 levels per channel)
pub const LUT_SIZE: usize = 4096;

/// 4x4 Bayer matrix, values 0-15
const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Distance used to pick the nearest palette color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorMetric {
    /// Squared RGB distance
    #[default]
    Euclidean,
    /// Squared luma difference (keeps brightness, ignores hue)
    Luma,
}

impl ColorMetric {
    fn distance(self, a: Rgb, b: Rgb) -> f32 {
        match self {
            ColorMetric::Euclidean => a.distance_sq(b) as f32,
            ColorMetric::Luma => {
                let d = a.luma() - b.luma();
                d * d
            }
        }
    }
}

/// Nearest-color and dither tables for one palette
#[derive(Clone, Debug)]
pub struct PaletteLut {
    name: String,
    metric: ColorMetric,
    nearest: Vec<Rgb>,
    dither: Vec<Rgb>,
}

impl PaletteLut {
    /// Build both tables for a palette
    pub fn build(palette: &Palette, metric: ColorMetric) -> Self {
        let colors = palette.colors();

        // Closest other palette entry for each palette entry
        let second_closest: Vec<usize> = (0..colors.len())
            .map(|i| {
                (0..colors.len())
                    .filter(|&j| j != i)
                    .min_by(|&a, &b| {
                        metric
                            .distance(colors[i], colors[a])
                            .total_cmp(&metric.distance(colors[i], colors[b]))
                    })
                    .unwrap_or(i)
            })
            .collect();

        let mut nearest = Vec::with_capacity(LUT_SIZE);
        let mut dither = Vec::with_capacity(LUT_SIZE);
        for value in 0..LUT_SIZE {
            let color = quantized_color(value);
            let closest = nearest_index(colors, color, metric);
            nearest.push(colors[closest]);
            dither.push(colors[second_closest[closest]]);
        }

        log::debug!("Built {:?} palette LUT for '{}'", metric, palette.name());

        Self {
            name: palette.name().to_string(),
            metric,
            nearest,
            dither,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metric(&self) -> ColorMetric {
        self.metric
    }

    /// Nearest palette color
    pub fn lookup(&self, color: Rgb) -> Rgb {
        self.nearest[lut_index(color)]
    }

    /// Dither partner of the nearest palette color
    pub fn dither_partner(&self, color: Rgb) -> Rgb {
        self.dither[lut_index(color)]
    }

    /// Ordered-dithered palette color for a pixel at (x, y).
    ///
    /// The partner color is chosen when the Bayer threshold falls below the
    /// relative distance to the nearest color.
    pub fn lookup_dithered(&self, color: Rgb, x: u32, y: u32) -> Rgb {
        let idx = lut_index(color);
        let near = self.nearest[idx];
        let partner = self.dither[idx];
        let d_near = self.metric.distance(color, near).sqrt();
        let d_partner = self.metric.distance(color, partner).sqrt();
        let total = d_near + d_partner;
        if total <= f32::EPSILON {
            return near;
        }
        let threshold = (BAYER_4X4[(y % 4) as usize][(x % 4) as usize] as f32 + 0.5) / 16.0;
        if threshold < d_near / total { partner } else { near }
    }

    /// Nearest table as a 64x64 texture
    pub fn to_image(&self) -> RgbImage {
        table_image(&self.nearest)
    }

    /// Dither table as a 64x64 texture
    pub fn dither_image(&self) -> RgbImage {
        table_image(&self.dither)
    }
}

/// Cache of built LUTs keyed by palette contents and metric.
///
/// Owned by whoever uploads palette textures; there is no global instance.
/// Name and colors together, so same-named palettes with different colors
/// get separate tables
type LutKey = (String, Vec<Rgb>, ColorMetric);

#[derive(Default)]
pub struct PaletteLutCache {
    luts: HashMap<LutKey, Arc<PaletteLut>>,
}

impl PaletteLutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the LUT for a palette, building it on first use
    pub fn get_or_build(&mut self, palette: &Palette, metric: ColorMetric) -> Arc<PaletteLut> {
        self.luts
            .entry((palette.name().to_string(), palette.colors().to_vec(), metric))
            .or_insert_with(|| Arc::new(PaletteLut::build(palette, metric)))
            .clone()
    }

    /// Number of cached tables
    pub fn len(&self) -> usize {
        self.luts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.luts.is_empty()
    }

    /// Drop every cached table
    pub fn clear(&mut self) {
        self.luts.clear();
    }
}

/// Quantized color for a LUT entry: `r * 256 + g * 16 + b`, each level * 16
fn quantized_color(value: usize) -> Rgb {
    Rgb::new(
        ((value / 256) * 16) as u8,
        (((value % 256) / 16) * 16) as u8,
        ((value % 16) * 16) as u8,
    )
}

fn lut_index(color: Rgb) -> usize {
    ((color.r() >> 4) as usize) * 256 + ((color.g() >> 4) as usize) * 16 + (color.b() >> 4) as usize
}

fn nearest_index(colors: &[Rgb], color: Rgb, metric: ColorMetric) -> usize {
    let mut closest = 0;
    let mut closest_dist = f32::INFINITY;
    for (i, &candidate) in colors.iter().enumerate() {
        let dist = metric.distance(color, candidate);
        if dist < closest_dist {
            closest = i;
            closest_dist = dist;
        }
    }
    closest
}

fn table_image(table: &[Rgb]) -> RgbImage {
    RgbImage::from_fn(LUT_WIDTH, LUT_WIDTH, |x, y| {
        image::Rgb(table[(y * LUT_WIDTH + x) as usize].0)
    })
}

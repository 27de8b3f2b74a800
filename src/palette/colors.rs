//! Built-in palettes

use super::color::Rgb;

/// `stone-brick`
pub const STONE_BRICK: [Rgb; 2] = [
    Rgb::new(0x60, 0x5c, 0x52),
    Rgb::new(0x2c, 0x2a, 0x25),
];

/// `nintendo-super-gameboy`
pub const SUPER_GAMEBOY: [Rgb; 4] = [
    Rgb::new(0x33, 0x1e, 0x50),
    Rgb::new(0xa6, 0x37, 0x25),
    Rgb::new(0xd6, 0x8e, 0x49),
    Rgb::new(0xf7, 0xe7, 0xc6),
];

/// `sweetie-16`
pub const SWEETIE16: [Rgb; 16] = [
    Rgb::new(0x1a, 0x1c, 0x2c),
    Rgb::new(0x5d, 0x27, 0x5d),
    Rgb::new(0xb1, 0x3e, 0x53),
    Rgb::new(0xef, 0x7d, 0x57),
    Rgb::new(0xff, 0xcd, 0x75),
    Rgb::new(0xa7, 0xf0, 0x70),
    Rgb::new(0x38, 0xb7, 0x64),
    Rgb::new(0x25, 0x71, 0x79),
    Rgb::new(0x29, 0x36, 0x6f),
    Rgb::new(0x3b, 0x5d, 0xc9),
    Rgb::new(0x41, 0xa6, 0xf6),
    Rgb::new(0x73, 0xef, 0xf7),
    Rgb::new(0xf4, 0xf4, 0xf4),
    Rgb::new(0x94, 0xb0, 0xc2),
    Rgb::new(0x56, 0x6c, 0x86),
    Rgb::new(0x33, 0x3c, 0x57),
];

/// `endesga-16`
pub const ENDESGA16: [Rgb; 16] = [
    Rgb::new(0xe4, 0xa6, 0x72),
    Rgb::new(0xb8, 0x6f, 0x50),
    Rgb::new(0x74, 0x3f, 0x39),
    Rgb::new(0x3f, 0x28, 0x32),
    Rgb::new(0x9e, 0x28, 0x35),
    Rgb::new(0xe5, 0x3b, 0x44),
    Rgb::new(0xfb, 0x92, 0x2b),
    Rgb::new(0xff, 0xe7, 0x62),
    Rgb::new(0x63, 0xc6, 0x4d),
    Rgb::new(0x32, 0x73, 0x45),
    Rgb::new(0x19, 0x3d, 0x3f),
    Rgb::new(0x4f, 0x67, 0x81),
    Rgb::new(0xaf, 0xbf, 0xd2),
    Rgb::new(0xff, 0xff, 0xff),
    Rgb::new(0x2c, 0xe8, 0xf4),
    Rgb::new(0x04, 0x84, 0xd1),
];

/// `ice-cream-gb`
pub const ICE_CREAM_GB: [Rgb; 4] = [
    Rgb::new(0x7c, 0x3f, 0x58),
    Rgb::new(0xeb, 0x6b, 0x6f),
    Rgb::new(0xf9, 0xa8, 0x75),
    Rgb::new(0xff, 0xf6, 0xd3),
];

/// `indecision`
pub const INDECISION: [Rgb; 17] = [
    Rgb::new(0xff, 0xf4, 0xe0),
    Rgb::new(0x8f, 0xcc, 0xcb),
    Rgb::new(0x44, 0x94, 0x89),
    Rgb::new(0x28, 0x57, 0x63),
    Rgb::new(0x2f, 0x2b, 0x5c),
    Rgb::new(0x4b, 0x3b, 0x9c),
    Rgb::new(0x45, 0x7c, 0xd6),
    Rgb::new(0xf2, 0xb6, 0x3d),
    Rgb::new(0xd4, 0x6e, 0x33),
    Rgb::new(0xe3, 0x42, 0x62),
    Rgb::new(0x94, 0x35, 0x3d),
    Rgb::new(0x57, 0x25, 0x3b),
    Rgb::new(0x9c, 0x65, 0x6c),
    Rgb::new(0xd1, 0xb4, 0x8c),
    Rgb::new(0xb4, 0xba, 0x47),
    Rgb::new(0x6d, 0x8c, 0x32),
    Rgb::new(0x2c, 0x1b, 0x2e),
];

/// `island-joy-16`
pub const ISLAND_JOY_16: [Rgb; 16] = [
    Rgb::new(0xff, 0xff, 0xff),
    Rgb::new(0x6d, 0xf7, 0xc1),
    Rgb::new(0x11, 0xad, 0xc1),
    Rgb::new(0x60, 0x6c, 0x81),
    Rgb::new(0x39, 0x34, 0x57),
    Rgb::new(0x1e, 0x88, 0x75),
    Rgb::new(0x5b, 0xb3, 0x61),
    Rgb::new(0xa1, 0xe5, 0x5a),
    Rgb::new(0xf7, 0xe4, 0x76),
    Rgb::new(0xf9, 0x92, 0x52),
    Rgb::new(0xcb, 0x4d, 0x68),
    Rgb::new(0x6a, 0x37, 0x71),
    Rgb::new(0xc9, 0x24, 0x64),
    Rgb::new(0xf4, 0x8c, 0xb6),
    Rgb::new(0xf7, 0xb6, 0x9e),
    Rgb::new(0x9b, 0x9c, 0x82),
];

/// Name and colors of every built-in palette
pub const BUILTIN: [(&str, &[Rgb]); 7] = [
    ("stone-brick", &STONE_BRICK),
    ("nintendo-super-gameboy", &SUPER_GAMEBOY),
    ("sweetie-16", &SWEETIE16),
    ("endesga-16", &ENDESGA16),
    ("ice-cream-gb", &ICE_CREAM_GB),
    ("indecision", &INDECISION),
    ("island-joy-16", &ISLAND_JOY_16),
];

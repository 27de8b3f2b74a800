//! Tile baker binary - writes brick textures for every visible tile face.
//!
//! Usage: cargo run --release --bin bake_tiles -- [OPTIONS]
//!
//! Options:
//!   --map <FILE>      Tile map in the CSV-like text format
//!   --size <N>        Noise map side in tiles when no --map (default: 16)
//!   --seed <SEED>     World seed (default: 12345)
//!   --height <H>      Tallest noise column (default: 6)
//!   --kind <NAME>     Material of noise maps (default: stone_wall)
//!   --config <FILE>   Generation config JSON (default: built-in)
//!   --out <DIR>       Output directory (default: "baked")
//!
//! Output structure:
//!   <out>/
//!     manifest.json             # Map size, config, per-tile face list
//!     config.json               # Config used for this bake
//!     stone_wall/
//!       tile_0_0_0_pz.png       # Albedo
//!       tile_0_0_0_pz_disp.png  # Displacement (cell bevel mask)
//!       ...

use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;
use serde_json::json;

use brickwork::core::Result;
use brickwork::generation::{GenerationConfig, GenerationPipeline};
use brickwork::map::{HeightField, HeightMap, NoiseParams, TileKind, TileMap};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let map_path = parse_str_arg(&args, "--map").map(PathBuf::from);
    let size = parse_u32_arg(&args, "--size").unwrap_or(16);
    let seed = parse_u64_arg(&args, "--seed");
    let max_height = parse_u32_arg(&args, "--height").unwrap_or(6);
    let kind_name = parse_str_arg(&args, "--kind").unwrap_or_else(|| "stone_wall".to_string());
    let config_path = parse_str_arg(&args, "--config").map(PathBuf::from);
    let output_dir = PathBuf::from(parse_str_arg(&args, "--out").unwrap_or_else(|| "baked".to_string()));

    let mut config = match &config_path {
        Some(path) => GenerationConfig::load(path).expect("Failed to load config"),
        None => GenerationConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let map = match &map_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).expect("Failed to read map file");
            TileMap::parse(&text).expect("Failed to parse map file")
        }
        None => {
            let kind = TileKind::ALL
                .into_iter()
                .find(|k| k.name() == kind_name)
                .unwrap_or_else(|| {
                    log::warn!("Unknown tile kind '{}', using stone_wall", kind_name);
                    TileKind::StoneWall
                });
            let params = NoiseParams {
                seed: config.seed as u32,
                max_height,
                ..NoiseParams::default()
            };
            TileMap::uniform(HeightMap::from_noise(size, size, &params), kind)
        }
    };
    let (width, depth) = map.size();

    println!("=== Brickwork Tile Baker ===");
    match &map_path {
        Some(path) => println!("Map:    {}", path.display()),
        None => println!("Map:    noise, max height {}", max_height),
    }
    println!("Size:   {} x {} tiles ({} occupied)", width, depth, map.heights().tile_count());
    println!("Seed:   {}", config.seed);
    println!(
        "Layout: {}px cells, top {:?}, side {:?}",
        config.layout.cell_px, config.layout.top_size(), config.layout.side_size()
    );
    println!("Output: {}", output_dir.display());
    println!();

    let pipeline = GenerationPipeline::new(&config).expect("Invalid generation config");

    let start = Instant::now();
    let tiles = pipeline.bake(&map).expect("Failed to bake tiles");
    let baked = start.elapsed();

    let start = Instant::now();
    let written: Vec<usize> = tiles
        .par_iter()
        .map(|tile| tile.write_images(&output_dir))
        .collect::<Result<_>>()
        .expect("Failed to write tile images");
    let files: usize = written.iter().sum();
    let saved = start.elapsed();

    println!("Baked:  {} tiles in {:.2?}", tiles.len(), baked);
    println!("Wrote:  {} images in {:.2?}", files, saved);

    config
        .save(&output_dir.join("config.json"))
        .expect("Failed to write config");

    let manifest = json!({
        "width": width,
        "depth": depth,
        "max_height": map.heights().max_height(),
        "seed": config.seed,
        "layout": config.layout,
        "materials": map.kinds_present().iter().map(|k| k.name()).collect::<Vec<_>>(),
        "tiles": tiles.iter().map(|t| {
            json!({
                "x": t.pos.x,
                "y": t.pos.y,
                "z": t.pos.z,
                "kind": t.kind.name(),
                "faces": t.faces.iter().map(|(d, _)| d.name()).collect::<Vec<_>>(),
            })
        }).collect::<Vec<_>>(),
    });

    let manifest_path = output_dir.join("manifest.json");
    let manifest_json = serde_json::to_string_pretty(&manifest).expect("Failed to encode manifest");
    std::fs::write(&manifest_path, manifest_json).expect("Failed to write manifest");

    println!();
    println!("=== Bake Complete ===");
    println!("Tiles:    {} with visible faces", tiles.len());
    println!("Manifest: {}", manifest_path.display());
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

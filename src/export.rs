use std::error::Error;
use std::fs::File;
use std::io::BufWriter;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::config::CaveConfig;
use crate::connect::Connection;
use crate::generator::{CaveLevel, GenerationStats};

const WALL_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const FLOOR_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const PASSAGE_COLOR: Rgb<u8> = Rgb([220, 80, 60]);
const MAIN_ROOM_COLOR: Rgb<u8> = Rgb([200, 225, 255]);

/// How to colour a level image.
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Pixels per tile side
    pub tile_size: u32,
    /// Draw passage centre lines
    pub show_passages: bool,
    /// Tint the main room's tiles
    pub highlight_main: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tile_size: 7,
            show_passages: false,
            highlight_main: false,
        }
    }
}

/// Render a level to an image: walls black, floor white.
pub fn render_level(level: &CaveLevel, options: &RenderOptions) -> RgbImage {
    let size = options.tile_size.max(1);
    let width = level.width() as u32 * size;
    let height = level.height() as u32 * size;
    let mut img: RgbImage = ImageBuffer::new(width, height);

    for (x, y, tile) in level.tiles().iter() {
        let color = if tile.is_wall() { WALL_COLOR } else { FLOOR_COLOR };
        fill_tile(&mut img, x as u32, y as u32, size, color);
    }

    if options.highlight_main {
        for tile in &level.main_room().tiles {
            fill_tile(&mut img, tile.x as u32, tile.y as u32, size, MAIN_ROOM_COLOR);
        }
    }

    if options.show_passages {
        for passage in level.passages() {
            for tile in &passage.line {
                fill_tile(&mut img, tile.x as u32, tile.y as u32, size, PASSAGE_COLOR);
            }
        }
    }

    img
}

fn fill_tile(img: &mut RgbImage, x: u32, y: u32, size: u32, color: Rgb<u8>) {
    for py in 0..size {
        for px in 0..size {
            img.put_pixel(x * size + px, y * size + py, color);
        }
    }
}

/// Export a level as a PNG.
pub fn export_level_png(level: &CaveLevel, path: &str, options: &RenderOptions) -> Result<(), image::ImageError> {
    render_level(level, options).save(path)
}

/// JSON document describing a level.
#[derive(Serialize)]
struct LevelDocument<'a> {
    seed: &'a str,
    width: usize,
    height: usize,
    config: &'a CaveConfig,
    /// One string per row, `#` wall and `.` floor
    rows: Vec<String>,
    main_room_size: usize,
    room_sizes: Vec<usize>,
    connections: &'a [Connection],
    stats: &'a GenerationStats,
}

/// Export a level as JSON.
pub fn export_level_json(level: &CaveLevel, path: &str) -> Result<(), Box<dyn Error>> {
    let rows = crate::ascii::render_grid(level.tiles())
        .lines()
        .map(str::to_string)
        .collect();

    let doc = LevelDocument {
        seed: level.seed().key(),
        width: level.width(),
        height: level.height(),
        config: level.config(),
        rows,
        main_room_size: level.main_room().size(),
        room_sizes: level.rooms().iter().map(|r| r.size()).collect(),
        connections: level.connections(),
        stats: level.stats(),
    };

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

//! Debug tool for comparing cave parameters visually
//! Generates a grid of levels with different settings from one seed

use std::error::Error;

use image::{ImageBuffer, Rgb, RgbImage};
use cave_generator::export::{render_level, RenderOptions};
use cave_generator::{generate_with_seed, CaveConfig, LevelSeed};

const SEED: &str = "42";
const WIDTH: usize = 96;
const HEIGHT: usize = 64;
const TILE_SIZE: u32 = 3;
const OUTPUT: &str = "cave_comparison.png";

fn main() -> Result<(), Box<dyn Error>> {
    println!("Generating cave comparison grid...");

    let base = CaveConfig::default().with_size(WIDTH, HEIGHT);

    let variants: Vec<(&str, CaveConfig)> = vec![
        ("1. Default", base.clone()),
        ("2. Fill 45", CaveConfig { fill_percent: 45.0, ..base.clone() }),
        ("3. Fill 55", CaveConfig { fill_percent: 55.0, ..base.clone() }),
        ("4. Smoothing 3", CaveConfig { smoothing_passes: 3, ..base.clone() }),
        ("5. Smoothing 30", CaveConfig { smoothing_passes: 30, ..base.clone() }),
        ("6. Room threshold 20", CaveConfig { room_threshold: 20, ..base.clone() }),
        ("7. Wall threshold 5", CaveConfig { wall_threshold: 5, ..base.clone() }),
        ("8. Radius 0", CaveConfig { passage_radius: 0, ..base.clone() }),
        ("9. Radius 3", CaveConfig { passage_radius: 3, ..base }),
    ];

    let options = RenderOptions {
        tile_size: TILE_SIZE,
        show_passages: true,
        highlight_main: true,
    };
    let cell_width = WIDTH as u32 * TILE_SIZE;
    let cell_height = HEIGHT as u32 * TILE_SIZE;

    let mut images: Vec<RgbImage> = Vec::new();
    for (name, config) in &variants {
        match generate_with_seed(config, LevelSeed::new(SEED)) {
            Ok(level) => {
                let stats = level.stats();
                println!(
                    "  {}: {} rooms, {} passages, {} floor tiles",
                    name, stats.rooms, stats.connections, stats.floor_tiles
                );
                images.push(render_level(&level, &options));
            }
            Err(err) => {
                println!("  {}: failed ({})", name, err);
                images.push(ImageBuffer::from_pixel(cell_width, cell_height, Rgb([120, 20, 20])));
            }
        }
    }

    let grid = create_grid(&images, 3, 3);
    grid.save(OUTPUT)?;

    println!("Saved {}", OUTPUT);
    Ok(())
}

/// Lay cells out left to right, top to bottom, each under a numbered label.
fn create_grid(images: &[RgbImage], cols: usize, rows: usize) -> RgbImage {
    if images.is_empty() {
        return ImageBuffer::new(1, 1);
    }

    let cell_width = images[0].width();
    let cell_height = images[0].height();
    let gap = 4u32;
    let label_height = 12u32;
    let pitch_x = cell_width + gap;
    let pitch_y = cell_height + label_height + gap;

    let mut grid: RgbImage =
        ImageBuffer::from_pixel(pitch_x * cols as u32, pitch_y * rows as u32, Rgb([40, 40, 40]));

    for (idx, img) in images.iter().enumerate().take(cols * rows) {
        let x_offset = (idx % cols) as u32 * pitch_x;
        let label_y = (idx / cols) as u32 * pitch_y;
        let y_offset = label_y + label_height;

        for (x, y, pixel) in img.enumerate_pixels() {
            if x < cell_width && y < cell_height {
                grid.put_pixel(x_offset + x, y_offset + y, *pixel);
            }
        }

        draw_number(&mut grid, x_offset + 3, label_y + 3, idx + 1);
    }

    grid
}

/// 3x5 digit glyphs, one row per entry, high bit on the left.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b011, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

fn draw_number(img: &mut RgbImage, x: u32, y: u32, value: usize) {
    let white = Rgb([255, 255, 255]);
    for (i, c) in value.to_string().chars().enumerate() {
        let Some(digit) = c.to_digit(10) else { continue };
        let cx = x + i as u32 * 4;
        for (row, &bits) in DIGITS[digit as usize].iter().enumerate() {
            for col in 0..3 {
                if (bits >> (2 - col)) & 1 == 1 {
                    let (px, py) = (cx + col, y + row as u32);
                    if px < img.width() && py < img.height() {
                        img.put_pixel(px, py, white);
                    }
                }
            }
        }
    }
}

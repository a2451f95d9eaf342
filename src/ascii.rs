//! ASCII rendering and export for generated levels
//!
//! `#` is wall, `.` is floor. Passage centre lines can be overlaid as `+`.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Write};

use chrono::Local;

use crate::generator::CaveLevel;
use crate::tilemap::{Tile, TileCoord, Tilemap};

pub const WALL_CHAR: char = '#';
pub const FLOOR_CHAR: char = '.';
pub const PASSAGE_CHAR: char = '+';

pub fn tile_char(tile: Tile) -> char {
    match tile {
        Tile::Wall => WALL_CHAR,
        Tile::Floor => FLOOR_CHAR,
    }
}

/// Render a grid, one text line per row.
pub fn render_grid(grid: &Tilemap<Tile>) -> String {
    let mut result = String::with_capacity((grid.width + 1) * grid.height);
    for y in 0..grid.height {
        for x in 0..grid.width {
            result.push(tile_char(*grid.get(x, y)));
        }
        result.push('\n');
    }
    result
}

/// Render a level, optionally marking passage centre lines.
pub fn render_ascii_map(level: &CaveLevel, show_passages: bool) -> String {
    if !show_passages {
        return render_grid(level.tiles());
    }

    let marked: HashSet<TileCoord> = level
        .passages()
        .iter()
        .flat_map(|p| p.line.iter().copied())
        .collect();

    let grid = level.tiles();
    let mut result = String::with_capacity((grid.width + 1) * grid.height);
    for y in 0..grid.height {
        for x in 0..grid.width {
            let ch = if marked.contains(&TileCoord::new(x as i32, y as i32)) {
                PASSAGE_CHAR
            } else {
                tile_char(*grid.get(x, y))
            };
            result.push(ch);
        }
        result.push('\n');
    }
    result
}

/// Parse rows of `#` (wall) and anything else (floor) into a grid.
///
/// Rows shorter than the first are padded with wall.
pub fn parse_ascii(rows: &[&str]) -> Tilemap<Tile> {
    let width = rows.first().map_or(0, |r| r.chars().count());
    let mut grid = Tilemap::new_with(width, rows.len(), Tile::Wall);
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().take(width).enumerate() {
            let tile = if ch == WALL_CHAR { Tile::Wall } else { Tile::Floor };
            grid.set(x, y, tile);
        }
    }
    grid
}

/// Print a level to stdout
pub fn print_ascii_map(level: &CaveLevel, show_passages: bool) {
    print!("{}", render_ascii_map(level, show_passages));
}

/// Write a level file: header, map and room list.
pub fn export_level_file(level: &CaveLevel, path: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    let config = level.config();
    let stats = level.stats();

    writeln!(file, "=== CAVE GENERATOR LEVEL FILE ===")?;
    writeln!(file, "Seed: {}", level.seed())?;
    writeln!(file, "Size: {}x{}", level.width(), level.height())?;
    writeln!(
        file,
        "Fill: {}%  Smoothing: {}  Wall threshold: {}  Room threshold: {}  Passage radius: {}",
        config.fill_percent,
        config.smoothing_passes,
        config.wall_threshold,
        config.room_threshold,
        config.passage_radius,
    )?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    write!(file, "{}", render_ascii_map(level, false))?;
    writeln!(file)?;

    writeln!(file, "=== ROOMS ({}) ===", level.rooms().len())?;
    for (id, room) in level.rooms().iter().enumerate() {
        let label = if room.is_main { " [main]" } else { "" };
        writeln!(
            file,
            "  {:>3}: {:>5} tiles, {:>4} edge tiles, linked to {:?}{}",
            id,
            room.size(),
            room.edge_tiles.len(),
            room.connected,
            label,
        )?;
    }
    writeln!(file)?;

    writeln!(file, "=== PASSAGES ({}) ===", level.connections().len())?;
    for c in level.connections() {
        writeln!(
            file,
            "  room {} {} -> room {} {} (distance^2 {})",
            c.room_a, c.tile_a, c.room_b, c.tile_b, c.distance_sq
        )?;
    }
    writeln!(file)?;

    writeln!(file, "=== STATS ===")?;
    writeln!(file, "  Wall specks removed: {}", stats.wall_regions_removed)?;
    writeln!(file, "  Floor pockets filled: {}", stats.floor_regions_removed)?;
    writeln!(file, "  Tiles carved: {}", stats.tiles_carved)?;
    let total = level.width() * level.height();
    writeln!(
        file,
        "  Floor: {} tiles ({:.1}%)",
        stats.floor_tiles,
        100.0 * stats.floor_tiles as f64 / total.max(1) as f64
    )?;

    Ok(())
}

//! Initial noise fill.

use rand::Rng;

use crate::tilemap::{Tile, Tilemap};

/// Produce the initial noisy grid.
///
/// Border tiles are always wall. Each interior tile is wall with probability
/// `fill_percent / 100`, drawn in column-major order with one `f64` per
/// interior tile. `fill_percent` is clamped to 0..=100 (0 never places a
/// wall, 100 always does).
pub fn random_fill<R: Rng>(width: usize, height: usize, fill_percent: f64, rng: &mut R) -> Tilemap<Tile> {
    let fill = if fill_percent.is_nan() { 0.0 } else { fill_percent.clamp(0.0, 100.0) };
    let mut grid = Tilemap::new_with(width, height, Tile::Wall);

    for (x, y) in grid.column_major() {
        if grid.is_border(x, y) {
            continue;
        }
        let roll: f64 = rng.gen();
        let tile = if roll * 100.0 < fill { Tile::Wall } else { Tile::Floor };
        grid.set(x, y, tile);
    }

    grid
}

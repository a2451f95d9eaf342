//! Passage carving
//!
//! Rasterizes a straight line between two tiles and stamps a filled disc of
//! floor at every tile on it.

use serde::Serialize;

use crate::tilemap::{Tile, TileCoord, Tilemap};

/// Tiles along a straight segment, walked with an integer error
/// accumulator.
///
/// Yields `max(|dx|, |dy|)` tiles starting at `from`; `to` itself is not
/// included. A clone walks independently from the current position, so a
/// fresh clone of an unstarted walk replays the whole line.
#[derive(Clone, Debug)]
pub struct LineTiles {
    current: TileCoord,
    remaining: i32,
    /// Unit step along the major axis
    step: (i32, i32),
    /// Unit step along the minor axis
    gradient_step: (i32, i32),
    longest: i32,
    shortest: i32,
    /// Twice the accumulated error, so the half-step start stays integral
    accumulation: i32,
}

/// Build the tile walk from `from` towards `to`.
pub fn line_tiles(from: TileCoord, to: TileCoord) -> LineTiles {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    let (longest, shortest, step, gradient_step) = if dx.abs() >= dy.abs() {
        (dx.abs(), dy.abs(), (dx.signum(), 0), (0, dy.signum()))
    } else {
        (dy.abs(), dx.abs(), (0, dy.signum()), (dx.signum(), 0))
    };

    LineTiles {
        current: from,
        remaining: longest,
        step,
        gradient_step,
        longest,
        shortest,
        accumulation: longest,
    }
}

impl Iterator for LineTiles {
    type Item = TileCoord;

    fn next(&mut self) -> Option<TileCoord> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let tile = self.current;
        self.current = self.current.offset(self.step.0, self.step.1);

        self.accumulation += 2 * self.shortest;
        if self.accumulation >= 2 * self.longest {
            self.current = self.current.offset(self.gradient_step.0, self.gradient_step.1);
            self.accumulation -= 2 * self.longest;
        }

        Some(tile)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for LineTiles {}

/// Clear every tile within `radius` of `center` to floor, clipped to the
/// grid. Returns how many tiles changed from wall to floor.
pub fn stamp_disc(grid: &mut Tilemap<Tile>, center: TileCoord, radius: i32) -> usize {
    stamp(grid, center, radius, false)
}

fn stamp(grid: &mut Tilemap<Tile>, center: TileCoord, radius: i32, keep_border: bool) -> usize {
    if radius < 0 || grid.width == 0 || grid.height == 0 {
        return 0;
    }

    // Only offsets that land inside the grid are walked
    let radius = radius as i64;
    let (cx, cy) = (center.x as i64, center.y as i64);
    let (max_x, max_y) = (grid.width as i64 - 1, grid.height as i64 - 1);
    let x_range = (-radius).max(-cx)..=radius.min(max_x - cx);
    let y_range = (-radius).max(-cy)..=radius.min(max_y - cy);

    let mut opened = 0;
    for dy in y_range {
        for dx in x_range.clone() {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let target = TileCoord::new((cx + dx) as i32, (cy + dy) as i32);
            if grid.at(target) != Some(&Tile::Wall) {
                continue;
            }
            if keep_border && grid.is_border(target.x as usize, target.y as usize) {
                continue;
            }
            grid.set_at(target, Tile::Floor);
            opened += 1;
        }
    }
    opened
}

/// The tiles of one carved corridor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Passage {
    pub from: TileCoord,
    pub to: TileCoord,
    /// Centre line of the corridor
    pub line: Vec<TileCoord>,
    /// Wall tiles opened while carving
    pub opened: usize,
}

/// Carve a corridor of the given radius from `from` to `to`.
///
/// Discs are clipped to the grid interior so the border ring stays wall.
/// Where the line takes a diagonal step the elbow tile is opened too, which
/// keeps a radius-0 corridor 4-connected.
pub fn carve_passage(grid: &mut Tilemap<Tile>, from: TileCoord, to: TileCoord, radius: i32) -> Passage {
    let line: Vec<TileCoord> = line_tiles(from, to).collect();

    let mut opened = 0;
    for (i, &tile) in line.iter().enumerate() {
        opened += stamp(grid, tile, radius, true);

        let next = line.get(i + 1).copied().unwrap_or(to);
        if next.x != tile.x && next.y != tile.y {
            opened += stamp(grid, TileCoord::new(next.x, tile.y), 0, true);
        }
    }

    Passage { from, to, line, opened }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> TileCoord {
        TileCoord::new(x, y)
    }

    #[test]
    fn test_horizontal_line() {
        let line: Vec<_> = line_tiles(c(1, 2), c(5, 2)).collect();
        assert_eq!(line, vec![c(1, 2), c(2, 2), c(3, 2), c(4, 2)]);
    }

    #[test]
    fn test_vertical_line_upwards() {
        let line: Vec<_> = line_tiles(c(3, 6), c(3, 3)).collect();
        assert_eq!(line, vec![c(3, 6), c(3, 5), c(3, 4)]);
    }

    #[test]
    fn test_diagonal_line() {
        let line: Vec<_> = line_tiles(c(0, 0), c(3, 3)).collect();
        assert_eq!(line, vec![c(0, 0), c(1, 1), c(2, 2)]);
    }

    #[test]
    fn test_shallow_line_matches_half_step_start() {
        // Accumulator starts at 2.5 and gains 2 per step: 4.5, 6.5 (minor
        // step, back to 1.5), 3.5, 5.5 (minor step, back to 0.5)
        let line: Vec<_> = line_tiles(c(0, 0), c(5, 2)).collect();
        assert_eq!(line, vec![c(0, 0), c(1, 0), c(2, 1), c(3, 1), c(4, 2)]);
    }

    #[test]
    fn test_same_point_is_empty() {
        assert_eq!(line_tiles(c(4, 4), c(4, 4)).count(), 0);
    }

    #[test]
    fn test_line_is_restartable_and_exact_size() {
        let line = line_tiles(c(2, 9), c(-7, 4));
        assert_eq!(line.len(), 9);
        let first: Vec<_> = line.clone().collect();
        let second: Vec<_> = line.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_disc_radius_one_is_plus_shape() {
        let mut grid = Tilemap::new_with(5, 5, Tile::Wall);
        let opened = stamp_disc(&mut grid, c(2, 2), 1);
        assert_eq!(opened, 5);
        assert_eq!(*grid.get(2, 1), Tile::Floor);
        assert_eq!(*grid.get(1, 1), Tile::Wall);
    }

    #[test]
    fn test_disc_clips_and_is_idempotent() {
        let mut grid = Tilemap::new_with(4, 4, Tile::Wall);
        stamp_disc(&mut grid, c(0, 0), 2);
        let once = grid.clone();
        assert_eq!(stamp_disc(&mut grid, c(0, 0), 2), 0);
        assert_eq!(grid, once);
        // (0..=2, 0), (0..=1, 1), (0, 2)
        assert_eq!(grid.count(Tile::Floor), 6);
    }

    #[test]
    fn test_oversized_radius_clears_small_grid() {
        let mut grid = Tilemap::new_with(4, 4, Tile::Wall);
        assert_eq!(stamp_disc(&mut grid, c(1, 1), 46_341), 16);
        assert_eq!(grid.count(Tile::Wall), 0);

        let mut grid = Tilemap::new_with(4, 4, Tile::Wall);
        assert_eq!(stamp_disc(&mut grid, c(1, 1), i32::MAX), 16);
    }

    #[test]
    fn test_oversized_radius_passage_keeps_border() {
        let mut grid = Tilemap::new_with(6, 6, Tile::Wall);
        let passage = carve_passage(&mut grid, c(1, 1), c(4, 4), 1_000_000);
        assert_eq!(passage.opened, 16);
        assert_eq!(grid.count(Tile::Floor), 16);
        assert_eq!(crate::verify::border_breach(&grid), None);
    }

    #[test]
    fn test_center_outside_grid() {
        let mut grid = Tilemap::new_with(4, 4, Tile::Wall);
        assert_eq!(stamp_disc(&mut grid, c(-10, -10), 3), 0);
        assert_eq!(stamp_disc(&mut grid, c(-1, 1), 1), 1);
        assert_eq!(*grid.get(0, 1), Tile::Floor);
    }

    #[test]
    fn test_radius_zero_carves_line_only() {
        let mut grid = Tilemap::new_with(8, 3, Tile::Wall);
        let passage = carve_passage(&mut grid, c(1, 1), c(6, 1), 0);
        assert_eq!(passage.line.len(), 5);
        assert_eq!(passage.opened, 5);
        assert_eq!(grid.count(Tile::Floor), 5);
        assert_eq!(*grid.get(6, 1), Tile::Wall);
    }

    #[test]
    fn test_passage_keeps_border() {
        let mut grid = Tilemap::new_with(8, 5, Tile::Wall);
        carve_passage(&mut grid, c(1, 1), c(6, 1), 2);
        for x in 0..8 {
            assert_eq!(*grid.get(x, 0), Tile::Wall);
        }
        assert_eq!(*grid.get(0, 1), Tile::Wall);
        assert_eq!(*grid.get(3, 3), Tile::Floor);
    }

    #[test]
    fn test_diagonal_steps_open_elbows() {
        let mut grid = Tilemap::new_with(6, 6, Tile::Wall);
        grid.set(1, 1, Tile::Floor);
        grid.set(4, 4, Tile::Floor);
        carve_passage(&mut grid, c(1, 1), c(4, 4), 0);
        let reached = crate::verify::reachable_from(&grid, c(1, 1));
        assert!(*reached.get(4, 4));
    }
}

//! Connected region extraction
//!
//! Splits all tiles of one kind into maximal 4-connected regions (no
//! diagonal adjacency).

use crate::tilemap::{Tile, TileCoord, Tilemap};

/// One maximal orthogonally-connected group of same-valued tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// The value every tile had at extraction time
    pub tile: Tile,
    pub tiles: Vec<TileCoord>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether any tile lies on the outermost ring of the grid.
    pub fn touches_border(&self, grid: &Tilemap<Tile>) -> bool {
        self.tiles
            .iter()
            .any(|t| grid.is_border(t.x as usize, t.y as usize))
    }

    /// Overwrite every tile of the region in the grid.
    pub fn paint(&self, grid: &mut Tilemap<Tile>, tile: Tile) {
        for &coord in &self.tiles {
            grid.set_at(coord, tile);
        }
    }
}

/// Find every region of `tile` in the grid.
///
/// Start tiles are discovered in column-major order and each region is
/// walked depth-first with an explicit stack, so the output order is a pure
/// function of the grid. A single visited map covers the whole scan, so
/// every matching tile is visited exactly once.
pub fn extract_regions(grid: &Tilemap<Tile>, tile: Tile) -> Vec<Region> {
    let mut visited = Tilemap::new_with(grid.width, grid.height, false);
    let mut regions = Vec::new();

    for (x, y) in grid.column_major() {
        if *visited.get(x, y) || *grid.get(x, y) != tile {
            continue;
        }
        let start = TileCoord::new(x as i32, y as i32);
        regions.push(flood_region(grid, &mut visited, start, tile));
    }

    regions
}

/// Collect the region containing `start` (which must hold `tile`).
fn flood_region(
    grid: &Tilemap<Tile>,
    visited: &mut Tilemap<bool>,
    start: TileCoord,
    tile: Tile,
) -> Region {
    let mut tiles = Vec::new();
    let mut stack = vec![start];
    visited.set_at(start, true);

    while let Some(current) = stack.pop() {
        tiles.push(current);

        for next in grid.neighbors(current) {
            let (nx, ny) = (next.x as usize, next.y as usize);
            if !*visited.get(nx, ny) && *grid.get(nx, ny) == tile {
                visited.set(nx, ny, true);
                stack.push(next);
            }
        }
    }

    Region { tile, tiles }
}

//! Size-based region filtering.

use tracing::debug;

use crate::error::{GenerationError, Result};
use crate::regions::{extract_regions, Region};
use crate::tilemap::{Tile, Tilemap};

/// What filtering removed and what it kept.
#[derive(Clone, Debug)]
pub struct FilterOutcome {
    /// Floor regions that met the room threshold, in extraction order
    pub rooms: Vec<Region>,
    /// Wall specks converted to floor
    pub wall_regions_removed: usize,
    /// Floor pockets converted to wall
    pub floor_regions_removed: usize,
}

/// Remove stray wall specks and tiny floor pockets.
///
/// Walls are cleaned first because opening a speck can merge neighbouring
/// floor regions. Wall regions that reach the grid edge are never opened. Returns `NoRooms` when no floor region survives; `seed`
/// only labels that error.
pub fn filter_regions(
    grid: &mut Tilemap<Tile>,
    wall_threshold: usize,
    room_threshold: usize,
    seed: &str,
) -> Result<FilterOutcome> {
    let mut wall_regions_removed = 0;
    for region in extract_regions(grid, Tile::Wall) {
        // The region holding the outer ring always stays wall
        if region.len() < wall_threshold && !region.touches_border(grid) {
            region.paint(grid, Tile::Floor);
            wall_regions_removed += 1;
        }
    }

    let mut floor_regions_removed = 0;
    let mut rooms = Vec::new();
    for region in extract_regions(grid, Tile::Floor) {
        if region.len() < room_threshold {
            region.paint(grid, Tile::Wall);
            floor_regions_removed += 1;
        } else {
            rooms.push(region);
        }
    }

    debug!(
        wall_regions_removed,
        floor_regions_removed,
        rooms = rooms.len(),
        "filtered regions"
    );

    if rooms.is_empty() {
        return Err(GenerationError::NoRooms { seed: seed.to_string() });
    }

    Ok(FilterOutcome {
        rooms,
        wall_regions_removed,
        floor_regions_removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::parse_ascii;

    #[test]
    fn test_wall_speck_removed_before_rooms() {
        let mut grid = parse_ascii(&[
            "#######",
            "#.....#",
            "#..#..#",
            "#.....#",
            "#######",
        ]);
        let outcome = filter_regions(&mut grid, 2, 1, "t").unwrap();
        assert_eq!(outcome.wall_regions_removed, 1);
        assert_eq!(outcome.rooms.len(), 1);
        assert_eq!(outcome.rooms[0].len(), 15);
    }

    #[test]
    fn test_small_pockets_filled() {
        let mut grid = parse_ascii(&[
            "#########",
            "#.##....#",
            "####....#",
            "#########",
        ]);
        let outcome = filter_regions(&mut grid, 1, 3, "t").unwrap();
        assert_eq!(outcome.floor_regions_removed, 1);
        assert_eq!(outcome.rooms.len(), 1);
        assert_eq!(*grid.get(1, 1), Tile::Wall);
        assert_eq!(grid.count(Tile::Floor), 8);
    }

    #[test]
    fn test_threshold_respected() {
        let mut grid = parse_ascii(&[
            "##########",
            "#..#.....#",
            "#..#.....#",
            "##########",
        ]);
        let outcome = filter_regions(&mut grid, 1, 5, "t").unwrap();
        assert!(outcome.rooms.iter().all(|r| r.len() >= 5));
        for region in extract_regions(&grid, Tile::Floor) {
            assert!(region.len() >= 5);
        }
    }

    #[test]
    fn test_border_ring_survives_large_wall_threshold() {
        let mut grid = Tilemap::new_with(10, 10, Tile::Wall);
        for y in 1..9 {
            for x in 1..9 {
                grid.set(x, y, Tile::Floor);
            }
        }
        let outcome = filter_regions(&mut grid, 40, 1, "t1").unwrap();
        assert_eq!(outcome.wall_regions_removed, 0);
        assert_eq!(grid.count(Tile::Wall), 36);
        assert_eq!(crate::verify::border_breach(&grid), None);
        assert_eq!(outcome.rooms.len(), 1);
        assert_eq!(outcome.rooms[0].len(), 64);
    }

    #[test]
    fn test_pillar_touching_border_is_kept() {
        let mut grid = parse_ascii(&[
            "#######",
            "#..#..#",
            "#.....#",
            "#######",
        ]);
        let outcome = filter_regions(&mut grid, 100, 1, "t").unwrap();
        assert_eq!(outcome.wall_regions_removed, 0);
        assert_eq!(*grid.get(3, 1), Tile::Wall);
    }

    #[test]
    fn test_all_wall_is_no_rooms() {
        let mut grid = Tilemap::new_with(5, 5, Tile::Wall);
        let err = filter_regions(&mut grid, 100, 100, "t1").unwrap_err();
        assert!(matches!(err, GenerationError::NoRooms { ref seed } if seed == "t1"));
        assert!(err.is_recoverable());
    }
}

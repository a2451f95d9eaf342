//! Post-generation checks.
//!
//! Re-derives the level invariants from the finished grid so tools and
//! tests can confirm a level is sound without trusting the pipeline's own
//! bookkeeping.
//!
//! # Checks
//!
//! - **Border**: every outermost tile is wall
//! - **Reachability**: every floor tile is 4-connected to the main room
//! - **Accessibility**: every room is flagged accessible from the main room

use std::fmt;

use crate::generator::CaveLevel;
use crate::tilemap::{Tile, TileCoord, Tilemap};

/// Category of a failed check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerifyCategory {
    Border,
    Reachability,
    Accessibility,
}

impl fmt::Display for VerifyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyCategory::Border => write!(f, "BORDER"),
            VerifyCategory::Reachability => write!(f, "REACHABILITY"),
            VerifyCategory::Accessibility => write!(f, "ACCESSIBILITY"),
        }
    }
}

/// A single failed check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyIssue {
    pub category: VerifyCategory,
    /// First offending tile, when the issue has a location
    pub location: Option<TileCoord>,
    pub message: String,
}

/// Result of verifying one level.
#[derive(Clone, Debug, Default)]
pub struct VerifyReport {
    pub issues: Vec<VerifyIssue>,
    pub floor_tiles: usize,
    pub reachable_tiles: usize,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_ok() {
            return format!("OK: {}/{} floor tiles reachable", self.reachable_tiles, self.floor_tiles);
        }
        let mut out = format!("{} issue(s):", self.issues.len());
        for issue in &self.issues {
            out.push_str(&format!("\n  [{}] {}", issue.category, issue.message));
        }
        out
    }
}

/// Flood fill over floor tiles from `start`; true marks reachable tiles.
pub fn reachable_from(grid: &Tilemap<Tile>, start: TileCoord) -> Tilemap<bool> {
    let mut reached = Tilemap::new_with(grid.width, grid.height, false);
    if grid.at(start) != Some(&Tile::Floor) {
        return reached;
    }

    let mut stack = vec![start];
    reached.set_at(start, true);
    while let Some(current) = stack.pop() {
        for next in grid.neighbors(current) {
            if grid.at(next) == Some(&Tile::Floor) && reached.at(next) == Some(&false) {
                reached.set_at(next, true);
                stack.push(next);
            }
        }
    }
    reached
}

/// First border tile that is not wall.
pub fn border_breach(grid: &Tilemap<Tile>) -> Option<TileCoord> {
    grid.iter()
        .find(|&(x, y, tile)| grid.is_border(x, y) && tile.is_floor())
        .map(|(x, y, _)| TileCoord::new(x as i32, y as i32))
}

/// Run every check against a finished level.
pub fn verify_level(level: &CaveLevel) -> VerifyReport {
    let grid = level.tiles();
    let mut report = VerifyReport {
        floor_tiles: grid.count(Tile::Floor),
        ..Default::default()
    };

    if let Some(tile) = border_breach(grid) {
        report.issues.push(VerifyIssue {
            category: VerifyCategory::Border,
            location: Some(tile),
            message: format!("border tile {tile} is floor"),
        });
    }

    let start = level.main_room().tiles.first().copied();
    let reached = match start {
        Some(start) => reachable_from(grid, start),
        None => Tilemap::new_with(grid.width, grid.height, false),
    };
    report.reachable_tiles = reached.iter().filter(|(_, _, r)| **r).count();

    let stranded: Vec<TileCoord> = grid
        .iter()
        .filter(|&(x, y, tile)| tile.is_floor() && !*reached.get(x, y))
        .map(|(x, y, _)| TileCoord::new(x as i32, y as i32))
        .collect();
    if let Some(&first) = stranded.first() {
        report.issues.push(VerifyIssue {
            category: VerifyCategory::Reachability,
            location: Some(first),
            message: format!("{} floor tile(s) unreachable from the main room, first at {first}", stranded.len()),
        });
    }

    for (id, room) in level.rooms().iter().enumerate() {
        if !room.is_accessible_from_main {
            report.issues.push(VerifyIssue {
                category: VerifyCategory::Accessibility,
                location: room.tiles.first().copied(),
                message: format!("room {id} ({} tiles) is not flagged accessible", room.size()),
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaveConfig;
    use crate::generator::generate;

    #[test]
    fn test_reachable_from_stops_at_walls() {
        let mut grid = Tilemap::new_with(5, 3, Tile::Floor);
        grid.set(2, 0, Tile::Wall);
        grid.set(2, 1, Tile::Wall);
        grid.set(2, 2, Tile::Wall);
        let reached = reachable_from(&grid, TileCoord::new(0, 0));
        assert!(*reached.get(1, 2));
        assert!(!*reached.get(3, 0));
        assert!(!*reached.get(2, 1));
    }

    #[test]
    fn test_reachable_from_wall_is_empty() {
        let grid = Tilemap::new_with(3, 3, Tile::Wall);
        let reached = reachable_from(&grid, TileCoord::new(1, 1));
        assert!(reached.iter().all(|(_, _, r)| !*r));
    }

    #[test]
    fn test_border_breach() {
        let mut grid = Tilemap::new_with(4, 4, Tile::Wall);
        assert_eq!(border_breach(&grid), None);
        grid.set(1, 1, Tile::Floor);
        assert_eq!(border_breach(&grid), None);
        grid.set(3, 2, Tile::Floor);
        assert_eq!(border_breach(&grid), Some(TileCoord::new(3, 2)));
    }

    #[test]
    fn test_generated_level_verifies() {
        let level = generate(&CaveConfig::default().with_seed("verify")).unwrap();
        let report = verify_level(&level);
        assert!(report.is_ok(), "{}", report.summary());
        assert_eq!(report.reachable_tiles, report.floor_tiles);
    }
}

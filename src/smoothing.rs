//! Cellular automaton smoothing
//!
//! Turns the initial noise into cave-like blobs with a neighbour-majority
//! rule. Each pass reads the previous generation and writes into a second
//! buffer; the buffers are swapped between passes.

use crate::tilemap::{Tile, Tilemap};

/// Wall-count at which a tile keeps its current state.
const BALANCE: usize = 4;

/// Number of walls among the 8 neighbours. Out-of-range neighbours count
/// as wall so caves close up against the map edge.
pub fn surrounding_wall_count(grid: &Tilemap<Tile>, x: usize, y: usize) -> usize {
    let mut count = 0;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if grid.is_wall_or_outside(x as i32 + dx, y as i32 + dy) {
                count += 1;
            }
        }
    }
    count
}

/// Apply `passes` smoothing iterations in place.
pub fn smooth(grid: &mut Tilemap<Tile>, passes: usize) {
    if passes == 0 {
        return;
    }

    let mut next = grid.clone();
    for _ in 0..passes {
        smooth_pass(grid, &mut next);
        std::mem::swap(grid, &mut next);
    }
}

/// One pass: reads only `current`, writes every cell of `next`.
fn smooth_pass(current: &Tilemap<Tile>, next: &mut Tilemap<Tile>) {
    for (x, y) in current.column_major() {
        let walls = surrounding_wall_count(current, x, y);
        let tile = match walls.cmp(&BALANCE) {
            std::cmp::Ordering::Greater => Tile::Wall,
            std::cmp::Ordering::Less => Tile::Floor,
            std::cmp::Ordering::Equal => *current.get(x, y),
        };
        next.set(x, y, tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::parse_ascii;

    #[test]
    fn test_outside_counts_as_wall() {
        let grid = Tilemap::new_with(3, 3, Tile::Floor);
        assert_eq!(surrounding_wall_count(&grid, 0, 0), 5);
        assert_eq!(surrounding_wall_count(&grid, 1, 0), 3);
        assert_eq!(surrounding_wall_count(&grid, 1, 1), 0);
    }

    #[test]
    fn test_zero_passes_is_identity() {
        let mut grid = parse_ascii(&["#.#", ".#.", "#.#"]);
        let before = grid.clone();
        smooth(&mut grid, 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_isolated_wall_vanishes_and_hole_fills() {
        let mut grid = parse_ascii(&[
            "#######",
            "#.....#",
            "#..#..#",
            "#.....#",
            "#######",
        ]);
        smooth(&mut grid, 1);
        assert_eq!(*grid.get(3, 2), Tile::Floor);

        let mut grid = parse_ascii(&[
            "#####",
            "#####",
            "##.##",
            "#####",
            "#####",
        ]);
        smooth(&mut grid, 1);
        assert_eq!(grid.count(Tile::Floor), 0);
    }

    #[test]
    fn test_pass_uses_snapshot() {
        // A diagonal wall line: an in-place update would let earlier cells
        // influence later ones within the same pass.
        let mut grid = parse_ascii(&[
            "#....",
            ".#...",
            "..#..",
            "...#.",
            "....#",
        ]);
        let snapshot = grid.clone();
        let mut expected = snapshot.clone();
        for (x, y) in snapshot.column_major() {
            let walls = surrounding_wall_count(&snapshot, x, y);
            if walls > 4 {
                expected.set(x, y, Tile::Wall);
            } else if walls < 4 {
                expected.set(x, y, Tile::Floor);
            }
        }
        smooth(&mut grid, 1);
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_exactly_four_keeps_state() {
        let mut grid = parse_ascii(&["#.#", "#..", "#.."]);
        assert_eq!(surrounding_wall_count(&grid, 1, 1), 4);
        let before = *grid.get(1, 1);
        smooth(&mut grid, 1);
        assert_eq!(*grid.get(1, 1), before);
    }
}

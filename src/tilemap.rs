use std::fmt;

use serde::{Deserialize, Serialize};

/// A single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    /// Open, walkable floor (bit 0)
    Floor = 0,
    /// Solid rock (bit 1)
    #[default]
    Wall = 1,
}

impl Tile {
    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }

    pub fn is_floor(self) -> bool {
        self == Tile::Floor
    }

    /// Binary occupancy value: 1 for wall, 0 for floor.
    pub fn bit(self) -> u8 {
        self as u8
    }

    pub fn from_bit(bit: u8) -> Self {
        if bit == 0 { Tile::Floor } else { Tile::Wall }
    }
}

/// Integer tile coordinate.
///
/// Signed so that neighbour and stamp offsets can be formed before
/// bounds clipping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another tile.
    pub fn distance_sq(self, other: TileCoord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal neighbour offsets (left, right, up, down).
pub const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A bounded 2D tilemap grid stored row-major. Does not wrap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "tile ({x}, {y}) out of range");
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Whether a signed coordinate lies inside the map.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.in_bounds(coord.x, coord.y)
    }

    /// Get a value by signed coordinate, `None` outside the map.
    pub fn get_checked(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(self.get(x as usize, y as usize))
        } else {
            None
        }
    }

    pub fn at(&self, coord: TileCoord) -> Option<&T> {
        self.get_checked(coord.x, coord.y)
    }

    /// Set by coordinate. Returns false (and does nothing) outside the map.
    pub fn set_at(&mut self, coord: TileCoord, value: T) -> bool {
        if self.contains(coord) {
            self.set(coord.x as usize, coord.y as usize, value);
            true
        } else {
            false
        }
    }

    /// Whether a cell lies on the outermost ring.
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// In-bounds orthogonal neighbours (4-connectivity).
    pub fn neighbors(&self, coord: TileCoord) -> impl Iterator<Item = TileCoord> + '_ {
        ORTHOGONAL
            .iter()
            .map(move |&(dx, dy)| coord.offset(dx, dy))
            .filter(move |c| self.contains(*c))
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Coordinates in column-major scan order (`x` outer, `y` inner).
    ///
    /// All pipeline stages that consume randomness or discover regions walk
    /// the map in this order.
    pub fn column_major(&self) -> impl Iterator<Item = (usize, usize)> {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| (x, y)))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Tilemap<Tile> {
    /// Treats anything outside the map as wall.
    pub fn is_wall_or_outside(&self, x: i32, y: i32) -> bool {
        self.get_checked(x, y).map_or(true, |t| t.is_wall())
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.data.iter().filter(|&&t| t == tile).count()
    }
}

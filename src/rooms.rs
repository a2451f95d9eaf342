//! Rooms built from surviving floor regions.

use serde::Serialize;

use crate::regions::Region;
use crate::tilemap::{Tile, TileCoord, Tilemap, ORTHOGONAL};

/// Index of a room in the room list.
pub type RoomId = usize;

/// A surviving floor region plus its connection state.
#[derive(Clone, Debug, Serialize)]
pub struct Room {
    pub tiles: Vec<TileCoord>,
    /// Floor tiles with at least one orthogonal wall neighbour, each listed
    /// once, in region order
    pub edge_tiles: Vec<TileCoord>,
    /// Rooms this one has a carved passage to
    pub connected: Vec<RoomId>,
    pub is_main: bool,
    pub is_accessible_from_main: bool,
}

impl Room {
    /// Build a room from a floor region. Anything outside the grid counts
    /// as wall when looking for edge tiles.
    pub fn from_region(region: Region, grid: &Tilemap<Tile>) -> Self {
        let edge_tiles = region
            .tiles
            .iter()
            .copied()
            .filter(|t| {
                ORTHOGONAL
                    .iter()
                    .any(|&(dx, dy)| grid.is_wall_or_outside(t.x + dx, t.y + dy))
            })
            .collect();

        Self {
            tiles: region.tiles,
            edge_tiles,
            connected: Vec::new(),
            is_main: false,
            is_accessible_from_main: false,
        }
    }

    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_connected(&self, other: RoomId) -> bool {
        self.connected.contains(&other)
    }
}

/// Turn filtered regions into rooms, largest first.
///
/// The sort is stable, so equal-sized rooms keep extraction order. The first
/// room is flagged as main and is accessible by definition.
pub fn build_rooms(regions: Vec<Region>, grid: &Tilemap<Tile>) -> Vec<Room> {
    let mut rooms: Vec<Room> = regions
        .into_iter()
        .map(|region| Room::from_region(region, grid))
        .collect();

    rooms.sort_by(|a, b| b.size().cmp(&a.size()));

    if let Some(main) = rooms.first_mut() {
        main.is_main = true;
        main.is_accessible_from_main = true;
    }

    rooms
}

//! Room connection graph
//!
//! Links every room to the main room in two phases:
//! - General pass: each room without connections is linked to its nearest
//!   room (nearest by edge-tile distance).
//! - Forced pass: while some rooms are still cut off, the closest pair between
//!   a cut-off room and a reachable room is linked, one pair at a time.
//!
//! Reachability from the main room is tracked with a disjoint set over room
//! indices. Ties between equally close pairs go to the first pair found in
//! (room A, room B, tile A, tile B) iteration order.

use serde::Serialize;
use tracing::debug;

use crate::error::{GenerationError, Result};
use crate::rooms::{Room, RoomId};
use crate::tilemap::TileCoord;

/// A planned passage between two rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub room_a: RoomId,
    pub room_b: RoomId,
    /// Edge tile of `room_a` where the passage starts
    pub tile_a: TileCoord,
    /// Edge tile of `room_b` where the passage ends
    pub tile_b: TileCoord,
    /// Squared distance between the two tiles
    pub distance_sq: i64,
}

/// Union-find with path halving and union by rank.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Merge the sets of `a` and `b`. Returns false if they were already one.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let a_root = self.find(a);
        let b_root = self.find(b);
        if a_root == b_root {
            return false;
        }
        if self.rank[a_root] < self.rank[b_root] {
            self.parent[a_root] = b_root;
        } else if self.rank[a_root] > self.rank[b_root] {
            self.parent[b_root] = a_root;
        } else {
            self.parent[b_root] = a_root;
            self.rank[a_root] += 1;
        }
        true
    }

    pub fn same(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

/// Closest edge-tile pair between two rooms. The first pair wins ties.
pub fn closest_edge_pair(a: &Room, b: &Room) -> Option<(TileCoord, TileCoord, i64)> {
    let mut best: Option<(TileCoord, TileCoord, i64)> = None;
    for &tile_a in &a.edge_tiles {
        for &tile_b in &b.edge_tiles {
            let dist = tile_a.distance_sq(tile_b);
            if best.map_or(true, |(_, _, d)| dist < d) {
                best = Some((tile_a, tile_b, dist));
            }
        }
    }
    best
}

struct RoomGraph<'a> {
    rooms: &'a mut [Room],
    sets: DisjointSet,
    main: RoomId,
    connections: Vec<Connection>,
}

impl RoomGraph<'_> {
    fn best_between(&self, candidates_a: &[RoomId], candidates_b: &[RoomId]) -> Option<Connection> {
        let mut best: Option<Connection> = None;
        for &a in candidates_a {
            for &b in candidates_b {
                if a == b || self.rooms[a].is_connected(b) {
                    continue;
                }
                let Some((tile_a, tile_b, distance_sq)) =
                    closest_edge_pair(&self.rooms[a], &self.rooms[b])
                else {
                    continue;
                };
                if best.map_or(true, |c| distance_sq < c.distance_sq) {
                    best = Some(Connection { room_a: a, room_b: b, tile_a, tile_b, distance_sq });
                }
            }
        }
        best
    }

    fn link(&mut self, connection: Connection) {
        let (a, b) = (connection.room_a, connection.room_b);
        self.rooms[a].connected.push(b);
        self.rooms[b].connected.push(a);
        self.sets.union(a, b);
        self.connections.push(connection);
    }

    fn is_accessible(&mut self, room: RoomId) -> bool {
        self.sets.same(room, self.main)
    }

    fn general_pass(&mut self) {
        let all: Vec<RoomId> = (0..self.rooms.len()).collect();
        for a in 0..self.rooms.len() {
            if !self.rooms[a].connected.is_empty() {
                continue;
            }
            if let Some(connection) = self.best_between(&[a], &all) {
                self.link(connection);
            }
        }
    }

    fn forced_pass(&mut self) -> Result<()> {
        loop {
            let (reachable, unreachable): (Vec<RoomId>, Vec<RoomId>) =
                (0..self.rooms.len()).partition(|&i| self.is_accessible(i));
            if unreachable.is_empty() {
                return Ok(());
            }
            match self.best_between(&unreachable, &reachable) {
                Some(connection) => self.link(connection),
                None => {
                    return Err(GenerationError::Disconnected { unreachable: unreachable.len() })
                }
            }
        }
    }

    fn write_accessibility(&mut self) {
        for i in 0..self.rooms.len() {
            let accessible = self.is_accessible(i);
            self.rooms[i].is_accessible_from_main = accessible;
        }
    }
}

/// Connect all rooms so each one is reachable from the main room.
///
/// Expects the main room to be flagged (see `build_rooms`); falls back to
/// room 0 otherwise. Updates each room's `connected` list and accessibility
/// flag, and returns the connections in the order they were made.
pub fn connect_rooms(rooms: &mut [Room]) -> Result<Vec<Connection>> {
    if rooms.is_empty() {
        return Ok(Vec::new());
    }

    let main = rooms.iter().position(|r| r.is_main).unwrap_or(0);
    let mut graph = RoomGraph {
        sets: DisjointSet::new(rooms.len()),
        rooms,
        main,
        connections: Vec::new(),
    };

    graph.general_pass();
    let general = graph.connections.len();
    graph.forced_pass()?;
    graph.write_accessibility();

    debug!(
        general,
        forced = graph.connections.len() - general,
        "connected rooms"
    );

    Ok(graph.connections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(tiles: &[(i32, i32)]) -> Room {
        let tiles: Vec<TileCoord> = tiles.iter().map(|&(x, y)| TileCoord::new(x, y)).collect();
        Room {
            edge_tiles: tiles.clone(),
            tiles,
            connected: Vec::new(),
            is_main: false,
            is_accessible_from_main: false,
        }
    }

    fn with_main(mut rooms: Vec<Room>) -> Vec<Room> {
        rooms[0].is_main = true;
        rooms[0].is_accessible_from_main = true;
        rooms
    }

    #[test]
    fn test_disjoint_set() {
        let mut sets = DisjointSet::new(5);
        assert!(!sets.same(0, 1));
        assert!(sets.union(0, 1));
        assert!(sets.union(3, 4));
        assert!(!sets.union(1, 0));
        assert!(sets.same(1, 0));
        assert!(!sets.same(1, 3));
        sets.union(1, 4);
        assert!(sets.same(0, 3));
        assert!(!sets.same(2, 0));
    }

    #[test]
    fn test_closest_pair_first_wins_ties() {
        let a = room(&[(0, 0), (0, 2)]);
        let b = room(&[(3, 1)]);
        // Both tiles of `a` are at distance 10 from (3, 1)
        let (tile_a, tile_b, dist) = closest_edge_pair(&a, &b).unwrap();
        assert_eq!(tile_a, TileCoord::new(0, 0));
        assert_eq!(tile_b, TileCoord::new(3, 1));
        assert_eq!(dist, 10);
    }

    #[test]
    fn test_single_room_needs_nothing() {
        let mut rooms = with_main(vec![room(&[(1, 1)])]);
        let connections = connect_rooms(&mut rooms).unwrap();
        assert!(connections.is_empty());
        assert!(rooms[0].is_accessible_from_main);
    }

    #[test]
    fn test_two_rooms_one_connection() {
        let mut rooms = with_main(vec![room(&[(1, 1), (2, 1)]), room(&[(6, 1)])]);
        let connections = connect_rooms(&mut rooms).unwrap();
        assert_eq!(connections.len(), 1);
        let c = connections[0];
        assert_eq!((c.room_a, c.room_b), (0, 1));
        assert_eq!(c.tile_a, TileCoord::new(2, 1));
        assert_eq!(c.distance_sq, 16);
        assert!(rooms.iter().all(|r| r.is_accessible_from_main));
        assert!(rooms[0].is_connected(1) && rooms[1].is_connected(0));
    }

    #[test]
    fn test_forced_pass_bridges_clusters() {
        // Two tight pairs far apart: the general pass links each pair, then
        // the forced pass must join the far pair to the main one.
        let mut rooms = with_main(vec![
            room(&[(0, 0)]),
            room(&[(2, 0)]),
            room(&[(40, 0)]),
            room(&[(42, 0)]),
        ]);
        let connections = connect_rooms(&mut rooms).unwrap();
        assert_eq!(connections.len(), 3);
        assert_eq!((connections[0].room_a, connections[0].room_b), (0, 1));
        assert_eq!((connections[1].room_a, connections[1].room_b), (2, 3));

        // Forced link goes from the unreachable side to the reachable side
        let forced = connections[2];
        assert_eq!((forced.room_a, forced.room_b), (2, 1));
        assert_eq!(forced.distance_sq, 38 * 38);
        assert!(rooms.iter().all(|r| r.is_accessible_from_main));
    }

    #[test]
    fn test_general_pass_skips_already_connected() {
        // Room 1 is linked by room 0's pass, so it does not search again.
        let mut rooms = with_main(vec![room(&[(0, 0)]), room(&[(1, 0)]), room(&[(3, 0)])]);
        let connections = connect_rooms(&mut rooms).unwrap();
        assert_eq!(connections.len(), 2);
        assert_eq!((connections[0].room_a, connections[0].room_b), (0, 1));
        assert_eq!((connections[1].room_a, connections[1].room_b), (2, 1));
    }

    #[test]
    fn test_room_without_edges_is_disconnected() {
        let mut rooms = with_main(vec![room(&[(0, 0)]), room(&[(5, 5)])]);
        rooms[1].edge_tiles.clear();
        let err = connect_rooms(&mut rooms).unwrap_err();
        assert!(matches!(err, GenerationError::Disconnected { unreachable: 1 }));
    }

    #[test]
    fn test_empty_room_list() {
        let mut rooms: Vec<Room> = Vec::new();
        assert!(connect_rooms(&mut rooms).unwrap().is_empty());
    }
}

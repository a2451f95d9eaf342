//! Level generation pipeline
//!
//! Runs the stages in order on one grid:
//! 1. Random fill from the seeded stream
//! 2. Cellular automaton smoothing
//! 3. Region filtering (wall specks, then small floor pockets)
//! 4. Room construction and connection
//! 5. Passage carving

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::config::CaveConfig;
use crate::connect::{connect_rooms, Connection};
use crate::error::Result;
use crate::fill::random_fill;
use crate::filter::filter_regions;
use crate::passage::{carve_passage, Passage};
use crate::rooms::{build_rooms, Room};
use crate::seeds::LevelSeed;
use crate::smoothing::smooth;
use crate::tilemap::{Tile, Tilemap};

/// Counters collected while generating one level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    /// Wall tiles right after the random fill
    pub initial_walls: usize,
    /// Wall tiles after smoothing
    pub smoothed_walls: usize,
    pub wall_regions_removed: usize,
    pub floor_regions_removed: usize,
    pub rooms: usize,
    pub connections: usize,
    /// Wall tiles opened by passage carving
    pub tiles_carved: usize,
    /// Floor tiles in the finished level
    pub floor_tiles: usize,
}

/// A finished level. The grid is read-only from here on.
#[derive(Clone, Debug)]
pub struct CaveLevel {
    grid: Tilemap<Tile>,
    seed: LevelSeed,
    config: CaveConfig,
    rooms: Vec<Room>,
    connections: Vec<Connection>,
    passages: Vec<Passage>,
    stats: GenerationStats,
}

impl CaveLevel {
    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    /// Tile at a position, `None` outside the level.
    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        if x < self.grid.width && y < self.grid.height {
            Some(*self.grid.get(x, y))
        } else {
            None
        }
    }

    /// Whether a position is wall. Outside the level counts as wall.
    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.tile(x, y).map_or(true, Tile::is_wall)
    }

    pub fn is_floor(&self, x: usize, y: usize) -> bool {
        self.tile(x, y) == Some(Tile::Floor)
    }

    pub fn tiles(&self) -> &Tilemap<Tile> {
        &self.grid
    }

    /// The seed that produced this level; pass it back to replay it.
    pub fn seed(&self) -> &LevelSeed {
        &self.seed
    }

    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    /// Rooms largest first. Room 0 is the main room.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn main_room(&self) -> &Room {
        &self.rooms[0]
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Dense row-major occupancy, 1 for wall and 0 for floor.
    pub fn to_bits(&self) -> Vec<u8> {
        self.grid.as_slice().iter().map(|t| t.bit()).collect()
    }
}

/// Holds a validated config and generates levels from it.
#[derive(Clone, Debug)]
pub struct CaveGenerator {
    config: CaveConfig,
}

impl CaveGenerator {
    pub fn new(config: CaveConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    /// Generate with the configured seed (or a clock-derived one).
    pub fn generate(&self) -> Result<CaveLevel> {
        generate(&self.config)
    }

    /// Generate with an explicit seed, ignoring the configured one.
    pub fn generate_seeded(&self, seed: impl Into<LevelSeed>) -> Result<CaveLevel> {
        generate_with_seed(&self.config, seed.into())
    }
}

/// Generate a level.
///
/// Without a configured seed one is derived from the clock; it is reported
/// on the returned level.
pub fn generate(config: &CaveConfig) -> Result<CaveLevel> {
    config.validate()?;
    let seed = LevelSeed::or_from_time(config.seed.as_deref());
    generate_with_seed(config, seed)
}

/// Generate a level from an explicit seed.
pub fn generate_with_seed(config: &CaveConfig, seed: LevelSeed) -> Result<CaveLevel> {
    config.validate()?;

    let span = info_span!("generate", seed = %seed, width = config.width, height = config.height);
    let _guard = span.enter();

    let mut stats = GenerationStats::default();
    let mut rng = seed.rng();

    let mut grid = random_fill(config.width, config.height, config.fill_percent, &mut rng);
    stats.initial_walls = grid.count(Tile::Wall);
    debug!(walls = stats.initial_walls, "random fill");

    smooth(&mut grid, config.smoothing_passes);
    stats.smoothed_walls = grid.count(Tile::Wall);
    debug!(passes = config.smoothing_passes, walls = stats.smoothed_walls, "smoothed");

    let filtered = filter_regions(&mut grid, config.wall_threshold, config.room_threshold, seed.key())?;
    stats.wall_regions_removed = filtered.wall_regions_removed;
    stats.floor_regions_removed = filtered.floor_regions_removed;

    let mut rooms = build_rooms(filtered.rooms, &grid);
    stats.rooms = rooms.len();

    let connections = connect_rooms(&mut rooms)?;
    stats.connections = connections.len();

    let passages: Vec<Passage> = connections
        .iter()
        .map(|c| carve_passage(&mut grid, c.tile_a, c.tile_b, config.passage_radius))
        .collect();
    stats.tiles_carved = passages.iter().map(|p| p.opened).sum();
    stats.floor_tiles = grid.count(Tile::Floor);

    info!(
        rooms = stats.rooms,
        connections = stats.connections,
        floor_tiles = stats.floor_tiles,
        "level generated"
    );

    Ok(CaveLevel {
        grid,
        seed,
        config: config.clone(),
        rooms,
        connections,
        passages,
        stats,
    })
}

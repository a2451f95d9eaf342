//! Cave level generation library
//!
//! Generates 2D cave levels as wall/floor grids where every floor tile is
//! reachable from the main room. Re-exports modules for use by binaries
//! and tools.

pub mod ascii;
pub mod config;
pub mod connect;
pub mod error;
pub mod export;
pub mod fill;
pub mod filter;
pub mod generator;
pub mod passage;
pub mod regions;
pub mod rooms;
pub mod seeds;
pub mod smoothing;
pub mod tilemap;
pub mod verify;

pub use config::CaveConfig;
pub use error::GenerationError;
pub use generator::{generate, generate_with_seed, CaveGenerator, CaveLevel, GenerationStats};
pub use seeds::LevelSeed;
pub use tilemap::{Tile, TileCoord, Tilemap};

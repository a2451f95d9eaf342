//! Configuration for cave generation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

/// Parameters for one generation run.
///
/// Passed by reference into the generator and never mutated by it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Grid width in tiles, border included (default: 150).
    pub width: usize,

    /// Grid height in tiles, border included (default: 80).
    pub height: usize,

    /// Chance (0-100) that an interior tile starts as wall (default: 50).
    pub fill_percent: f64,

    /// Cellular automaton iterations (default: 14).
    pub smoothing_passes: usize,

    /// Wall regions smaller than this become floor (default: 30).
    pub wall_threshold: usize,

    /// Floor regions smaller than this become wall (default: 100).
    pub room_threshold: usize,

    /// Radius of the disc stamped along each passage (default: 1).
    pub passage_radius: i32,

    /// Seed key. `None` derives one from the clock.
    pub seed: Option<String>,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            width: 150,
            height: 80,
            fill_percent: 50.0,
            smoothing_passes: 14,
            wall_threshold: 30,
            room_threshold: 100,
            passage_radius: 1,
            seed: None,
        }
    }
}

impl CaveConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Check every parameter before generation starts.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GenerationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=100.0).contains(&self.fill_percent) {
            return Err(GenerationError::InvalidFillPercent(self.fill_percent));
        }
        if self.wall_threshold == 0 {
            return Err(GenerationError::InvalidThreshold {
                name: "wall_threshold",
                value: self.wall_threshold,
            });
        }
        if self.room_threshold == 0 {
            return Err(GenerationError::InvalidThreshold {
                name: "room_threshold",
                value: self.room_threshold,
            });
        }
        if self.passage_radius < 0 {
            return Err(GenerationError::InvalidPassageRadius(self.passage_radius));
        }
        Ok(())
    }
}

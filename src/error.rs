//! Error types for cave generation.

use thiserror::Error;

/// Everything that can stop a generation run.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Width or height is zero.
    #[error("invalid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    /// Fill percentage outside 0..=100 (or not a number).
    #[error("invalid fill percent {0}: expected a value in 0..=100")]
    InvalidFillPercent(f64),

    /// A region size threshold is zero.
    #[error("invalid {name} {value}: must be at least 1")]
    InvalidThreshold { name: &'static str, value: usize },

    /// Negative passage radius.
    #[error("invalid passage radius {0}: must not be negative")]
    InvalidPassageRadius(i32),

    /// Filtering removed every floor region. Retry with another seed or
    /// relaxed thresholds.
    #[error("no rooms survived filtering (seed {seed})")]
    NoRooms { seed: String },

    /// The connection phase ended with rooms still unreachable from the
    /// main room.
    #[error("{unreachable} room(s) could not be connected to the main room")]
    Disconnected { unreachable: usize },

    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// A config file was not valid JSON for `CaveConfig`.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl GenerationError {
    /// Errors raised by configuration checks before any work is done.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            GenerationError::InvalidDimensions { .. }
                | GenerationError::InvalidFillPercent(_)
                | GenerationError::InvalidThreshold { .. }
                | GenerationError::InvalidPassageRadius(_)
                | GenerationError::ConfigIo(_)
                | GenerationError::ConfigParse(_)
        )
    }

    /// Whether a caller may succeed by retrying with a different seed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GenerationError::NoRooms { .. })
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

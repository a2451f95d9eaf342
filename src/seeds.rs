//! Seed management for level generation
//!
//! A level seed is a string key so that levels can be shared as short words
//! ("t1", "castle") as well as numbers. The key fully determines the random
//! stream used to fill the initial grid.

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Reproducibility key for one generated level.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelSeed {
    key: String,
}

impl LevelSeed {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Derive a seed from the current wall-clock time in milliseconds.
    pub fn from_time() -> Self {
        Self::new(Utc::now().timestamp_millis().to_string())
    }

    /// Use the given key, or derive one from the clock when absent.
    pub fn or_from_time(key: Option<&str>) -> Self {
        match key {
            Some(k) => Self::new(k),
            None => Self::from_time(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The numeric seed for the random stream.
    ///
    /// Keys that are plain `u64` numbers are used as-is. Everything else is
    /// hashed with 64-bit FNV-1a, which is stable across platforms and
    /// toolchains.
    pub fn value(&self) -> u64 {
        self.key.parse::<u64>().unwrap_or_else(|_| fnv1a(self.key.as_bytes()))
    }

    /// Build the deterministic random stream for this seed.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.value())
    }

    /// Deterministically derive the seed for a retry attempt.
    pub fn retry(&self, attempt: u32) -> Self {
        Self::new(format!("{}-{}", self.key, attempt))
    }
}

impl From<&str> for LevelSeed {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<u64> for LevelSeed {
    fn from(value: u64) -> Self {
        Self::new(value.to_string())
    }
}

impl std::fmt::Display for LevelSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}

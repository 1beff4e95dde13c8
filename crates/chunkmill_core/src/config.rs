//! # World Configuration
//!
//! Sizing and pacing for a world. Loaded once at startup, validated before
//! any chunk is allocated, and immutable afterwards.
//!
//! ```toml
//! chunk_count = 100
//! blocks_per_chunk = 65536
//! entities_per_chunk = 1000
//! worker_count = 8
//! player_step = { x = 0.1, y = 0.0, z = 0.0 }
//! ```

use std::num::NonZeroUsize;
use std::path::Path;

use chunkmill_shared::{Vec3, BLOCK_COUNT, CHUNK_COUNT, N_BLOCKS, N_ENTITIES, PLAYER_STEP};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::sim::ChunkCapacity;

/// Configuration for a `World`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Number of chunks kept alive. Doubles as the recycle radius.
    pub chunk_count: usize,
    /// Block identifiers per chunk (multiple of 4).
    pub blocks_per_chunk: usize,
    /// Entities per chunk (multiple of 4).
    pub entities_per_chunk: usize,
    /// Entries in the static block catalog. Must equal `BLOCK_COUNT`, since
    /// block cells hold `i % BLOCK_COUNT` and every cell must resolve.
    pub block_catalog_size: usize,
    /// Worker threads in the scheduler.
    pub worker_count: usize,
    /// Bounded job queue length. Defaults to `chunk_count`.
    pub queue_capacity: Option<usize>,
    /// Player displacement per tick.
    pub player_step: Vec3,
    /// Player position before the first tick.
    pub player_start: Vec3,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_count: CHUNK_COUNT,
            blocks_per_chunk: N_BLOCKS,
            entities_per_chunk: N_ENTITIES,
            block_catalog_size: BLOCK_COUNT,
            worker_count: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            queue_capacity: None,
            player_step: PLAYER_STEP,
            player_start: Vec3::ZERO,
        }
    }
}

impl WorldConfig {
    /// Small world for tests and benches: 256 blocks per chunk, 2 workers.
    #[must_use]
    pub fn compact(chunk_count: usize, entities_per_chunk: usize) -> Self {
        Self {
            chunk_count,
            blocks_per_chunk: 256,
            entities_per_chunk,
            worker_count: 2,
            ..Self::default()
        }
    }

    /// Parses a config from TOML. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed TOML, or any validation error.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks every capacity constraint.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> ConfigResult<()> {
        at_least("chunk_count", self.chunk_count, 1)?;
        at_least("worker_count", self.worker_count, 1)?;
        at_least("queue_capacity", self.queue_capacity(), 1)?;
        if self.block_catalog_size != BLOCK_COUNT {
            return Err(ConfigError::CapacityViolation {
                field: "block_catalog_size",
                value: self.block_catalog_size,
                reason: "must equal BLOCK_COUNT so every block cell resolves",
            });
        }
        if !self.player_step.is_finite() {
            return Err(ConfigError::NonFinite { field: "player_step" });
        }
        if !self.player_start.is_finite() {
            return Err(ConfigError::NonFinite { field: "player_start" });
        }
        self.chunk_capacity().map(|_| ())
    }

    /// Validated per-chunk capacities.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CapacityViolation` if either count is not a
    /// positive multiple of 4.
    pub fn chunk_capacity(&self) -> ConfigResult<ChunkCapacity> {
        ChunkCapacity::new(self.blocks_per_chunk, self.entities_per_chunk)
    }

    /// Effective job queue length.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(self.chunk_count)
    }

    /// Distance beyond which a chunk is recycled.
    ///
    /// This is the chunk count itself, not a separate view radius.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn recycle_radius(&self) -> f32 {
        self.chunk_count as f32
    }
}

fn at_least(field: &'static str, value: usize, min: usize) -> ConfigResult<()> {
    if value < min {
        return Err(ConfigError::CapacityViolation {
            field,
            value,
            reason: "must be at least 1",
        });
    }
    Ok(())
}

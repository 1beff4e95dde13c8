//! # Engine Error Types
//!
//! The core is total over well-formed inputs. Everything here is either a
//! configuration the engine refuses to start with, or a tick that could not
//! complete.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a `WorldConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for a `WorldConfig`.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A fixed capacity does not satisfy its constraint.
    #[error("capacity violation: {field} = {value} ({reason})")]
    CapacityViolation {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: usize,
        /// Constraint that was violated.
        reason: &'static str,
    },

    /// A vector setting contains NaN or infinity.
    #[error("{field} must be finite")]
    NonFinite {
        /// Offending field.
        field: &'static str,
    },
}

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by the worker pool.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// A pool needs at least one worker to make progress.
    #[error("scheduler requires at least one worker")]
    NoWorkers,

    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// One or more tasks panicked since the last barrier.
    #[error("{failed} task(s) panicked, first: {message}")]
    TaskPanicked {
        /// Number of failed tasks.
        failed: usize,
        /// Panic message of the first failure.
        message: String,
    },

    /// The pool has shut down and accepts no more work.
    #[error("scheduler is shut down")]
    Disconnected,
}

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Errors raised by the world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// Invalid world configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The worker pool failed.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// `tick` was called before `build_initial`.
    #[error("world has not been built")]
    NotBuilt,

    /// `build_initial` was called twice.
    #[error("world is already built")]
    AlreadyBuilt,

    /// A chunk went into a task and never came back.
    #[error("chunk in slot {slot} was lost by a failed update task")]
    ChunkLost {
        /// Slot of the missing chunk.
        slot: usize,
    },

    /// An earlier tick failed; the world state can no longer be trusted.
    #[error("world is poisoned by an earlier failed tick")]
    Poisoned,
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;

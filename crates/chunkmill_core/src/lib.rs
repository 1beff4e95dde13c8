//! # CHUNKMILL Core Engine
//!
//! A world of fixed-capacity chunks, updated once per tick across a pool of
//! worker threads:
//! - Constant memory footprint for the lifetime of the process
//! - Chunks drifting out of range are recycled in place
//! - Zero heap allocations while a chunk updates or recycles
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in hot path** - chunk storage is allocated once
//! 2. **Single writer per chunk** - a chunk is moved into exactly one job per
//!    tick and moved back afterwards; no per-chunk locks exist
//! 3. **Ticks never overlap** - `World::tick` returns only after the
//!    scheduler barrier
//!
//! ## Example
//!
//! ```rust,ignore
//! use chunkmill_core::{World, WorldConfig};
//!
//! let mut world = World::with_config(WorldConfig::default())?;
//! world.build_initial()?;
//! loop {
//!     world.tick()?;
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod sim;
pub mod sync;
pub mod world;

pub use chunkmill_shared::Vec3;
pub use config::WorldConfig;
pub use error::{
    ConfigError, ConfigResult, SchedulerError, SchedulerResult, WorldError, WorldResult,
};
pub use sim::{Block, BlockCatalog, Chunk, ChunkCapacity, Entity, EntityKind};
pub use sync::{AtomicIdentity, IdentitySource, Job, Scheduler};
pub use world::{TickReport, World};

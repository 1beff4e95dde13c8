//! # CHUNKMILL Shared
//!
//! Value types used by the engine core and the harness.
//!
//! ## CRITICAL RULE
//!
//! Nothing in this crate owns threads, locks, or heap storage.
//! Everything here is `Copy` or `const`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{BLOCK_COUNT, CHUNK_COUNT, N_BLOCKS, N_ENTITIES, PLAYER_STEP, TICK_BUDGET_MS};
pub use math::Vec3;

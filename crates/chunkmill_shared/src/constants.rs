//! # World Sizing Constants
//!
//! Default sizes for a production world. The engine reads them through
//! `WorldConfig`, so a TOML file can override any of them at startup.
//!
//! **CRITICAL:** `N_BLOCKS` and `N_ENTITIES` must stay multiples of 4.

use crate::math::Vec3;

// =============================================================================
// WORLD SIZING
// =============================================================================

/// Number of chunks the world keeps alive.
///
/// Also used as the recycle radius: a chunk farther than this many units
/// from the player is recycled.
pub const CHUNK_COUNT: usize = 100;

/// Block identifiers stored per chunk.
pub const N_BLOCKS: usize = 65_536;

/// Entities stored per chunk.
pub const N_ENTITIES: usize = 1_000;

/// Entries in the static block catalog. Every id must fit a `u8`.
pub const BLOCK_COUNT: usize = 256;

// =============================================================================
// PLAYER
// =============================================================================

/// Player displacement applied at the start of every tick.
pub const PLAYER_STEP: Vec3 = Vec3::new(0.1, 0.0, 0.0);

// =============================================================================
// TIMING
// =============================================================================

/// Frame budget for one tick in milliseconds (~60 ticks per second).
pub const TICK_BUDGET_MS: u64 = 16;

const _: () = assert!(N_BLOCKS % 4 == 0);
const _: () = assert!(N_ENTITIES % 4 == 0);
const _: () = assert!(BLOCK_COUNT <= 256);

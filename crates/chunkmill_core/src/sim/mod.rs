//! # Simulation Data Model
//!
//! Entities, blocks and the chunks that own them.
//!
//! ## Design Philosophy
//!
//! - A chunk allocates its storage once, at construction
//! - Recycling overwrites that storage in place
//! - Per-tick work is plain iteration over contiguous slices

mod block;
mod chunk;
mod entity;

pub use block::{Block, BlockCatalog};
pub use chunk::{Chunk, ChunkCapacity};
pub use entity::{Entity, EntityKind};

//! # Chunk System
//!
//! A chunk is the unit of spatial partition and of concurrency. It owns a
//! fixed-capacity block array and a fixed-capacity entity array.
//!
//! ## Storage
//!
//! Both arrays are boxed slices allocated once by [`Chunk::new`]. Recycling
//! reseeds them in place: the slices keep their address and length for the
//! chunk's whole lifetime, so a long-running world holds a constant
//! footprint no matter how many chunks churn.
//!
//! ## Seeding
//!
//! - block `i` holds id `i % BLOCK_COUNT`, an index into the world's catalog
//! - entity `i` is `EntityKind::for_slot(i)` at `(i, i, i)`
//!
//! Entity positions are chunk-local: a recycled chunk reseeds them at the
//! same `(i, i, i)` layout it started with.

use chunkmill_shared::{Vec3, BLOCK_COUNT};

use super::entity::{Entity, EntityKind};
use crate::error::{ConfigError, ConfigResult};
use crate::sync::IdentitySource;

/// Validated per-chunk capacities.
///
/// Both counts are positive multiples of 4. A `Chunk` can only be built from
/// one of these, so a malformed chunk never reaches the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkCapacity {
    blocks: usize,
    entities: usize,
}

impl ChunkCapacity {
    /// Validates and wraps the per-chunk counts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CapacityViolation` if either count is zero or
    /// not a multiple of 4.
    pub fn new(blocks: usize, entities: usize) -> ConfigResult<Self> {
        check_multiple_of_four("blocks_per_chunk", blocks)?;
        check_multiple_of_four("entities_per_chunk", entities)?;
        Ok(Self { blocks, entities })
    }

    /// Block identifiers per chunk.
    #[inline]
    #[must_use]
    pub const fn blocks(self) -> usize {
        self.blocks
    }

    /// Entities per chunk.
    #[inline]
    #[must_use]
    pub const fn entities(self) -> usize {
        self.entities
    }
}

fn check_multiple_of_four(field: &'static str, value: usize) -> ConfigResult<()> {
    if value == 0 || value % 4 != 0 {
        return Err(ConfigError::CapacityViolation {
            field,
            value,
            reason: "must be a positive multiple of 4",
        });
    }
    Ok(())
}

/// A fixed-capacity spatial partition.
#[derive(Debug)]
pub struct Chunk {
    position: Vec3,
    blocks: Box<[u8]>,
    entities: Box<[Entity]>,
}

impl Chunk {
    /// Largest identity whose position is exact in `f32`.
    pub const MAX_EXACT_ID: u64 = 1 << f32::MANTISSA_DIGITS;

    /// Builds a chunk at `position`, allocating its storage.
    ///
    /// This is the only place a chunk allocates.
    #[must_use]
    pub fn new(position: Vec3, capacity: ChunkCapacity) -> Self {
        let mut chunk = Self {
            position,
            blocks: vec![0u8; capacity.blocks()].into_boxed_slice(),
            entities: vec![Entity::new(EntityKind::Wanderer, Vec3::ZERO); capacity.entities()]
                .into_boxed_slice(),
        };
        chunk.seed();
        chunk
    }

    /// Position a chunk takes when given identity `id`: `(id, 0, 0)`.
    ///
    /// Exact for ids up to [`Chunk::MAX_EXACT_ID`] (2^24). Past that, `f32`
    /// rounds and consecutive ids can share a position.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn origin_for(id: u64) -> Vec3 {
        Vec3::new(id as f32, 0.0, 0.0)
    }

    /// Fills both arrays with the deterministic seed pattern.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn seed(&mut self) {
        for (i, block) in self.blocks.iter_mut().enumerate() {
            *block = (i % BLOCK_COUNT) as u8;
        }
        for (i, entity) in self.entities.iter_mut().enumerate() {
            *entity = Entity::new(EntityKind::for_slot(i), Vec3::splat(i as f32));
        }
    }

    /// Runs one tick for this chunk.
    ///
    /// Advances every entity, then recycles the chunk at a fresh identity if
    /// it is farther than `radius` from `player`. Returns `true` if the chunk
    /// was recycled.
    ///
    /// This is a **zero-allocation** operation.
    pub fn update(&mut self, player: Vec3, radius: f32, ids: &dyn IdentitySource) -> bool {
        self.advance_entities();
        if !self.is_out_of_range(player, radius) {
            return false;
        }
        let id = ids.next_id();
        self.recycle(Self::origin_for(id));
        tracing::trace!(id, "chunk recycled");
        true
    }

    /// Advances every entity by one velocity step.
    #[inline]
    pub fn advance_entities(&mut self) {
        for entity in self.entities.iter_mut() {
            entity.update();
        }
    }

    /// True when the chunk is strictly farther than `radius` from `player`.
    ///
    /// A chunk exactly `radius` away stays.
    #[inline]
    #[must_use]
    pub fn is_out_of_range(&self, player: Vec3, radius: f32) -> bool {
        self.position.distance(player) > radius
    }

    /// Discards all contents and reseeds them at `position`, in place.
    ///
    /// This is a **zero-allocation** operation - the backing slices are
    /// overwritten, never replaced.
    pub fn recycle(&mut self, position: Vec3) {
        self.position = position;
        self.seed();
    }

    /// Chunk position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Block identifiers.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[u8] {
        &self.blocks
    }

    /// Entities.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Capacities this chunk was built with.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> ChunkCapacity {
        ChunkCapacity {
            blocks: self.blocks.len(),
            entities: self.entities.len(),
        }
    }
}

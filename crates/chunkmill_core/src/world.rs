//! # World
//!
//! Owns every chunk, the block catalog, the player position and the worker
//! pool, and runs one tick at a time.
//!
//! ## One Tick
//!
//! ```text
//! 1. player += step, snapshot it
//! 2. move each chunk box into a ChunkJob, submit it
//! 3. await_idle()               <- barrier, ticks never overlap
//! 4. drain returned chunks back into their slots
//! ```
//!
//! Chunks travel by ownership: the job holds the only reference to its chunk,
//! so no two workers can touch the same chunk and no lock is needed. The box
//! moves, the heap allocation behind it does not.

use std::sync::Arc;

use chunkmill_shared::Vec3;
use crossbeam_channel::{bounded, Receiver, Sender};

use crate::config::WorldConfig;
use crate::error::{WorldError, WorldResult};
use crate::sim::{BlockCatalog, Chunk, ChunkCapacity};
use crate::sync::{AtomicIdentity, IdentitySource, Job, Scheduler};

/// Summary of one completed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Player position every chunk saw during this tick.
    pub player_position: Vec3,
    /// Chunks recycled during this tick.
    pub recycled: usize,
}

/// A chunk on its way back from a worker.
struct ChunkReturn {
    slot: usize,
    chunk: Box<Chunk>,
    recycled: bool,
}

/// Update work for one chunk in one tick.
struct ChunkJob {
    slot: usize,
    chunk: Box<Chunk>,
    player: Vec3,
    radius: f32,
    ids: Arc<dyn IdentitySource>,
    done: Sender<ChunkReturn>,
}

impl Job for ChunkJob {
    fn run(self) {
        let Self {
            slot,
            mut chunk,
            player,
            radius,
            ids,
            done,
        } = self;
        let recycled = chunk.update(player, radius, ids.as_ref());
        // Capacity equals the chunk count, so this never blocks.
        let _ = done.send(ChunkReturn {
            slot,
            chunk,
            recycled,
        });
    }
}

/// The simulated world.
///
/// Build with [`World::new`], populate once with [`World::build_initial`],
/// then call [`World::tick`] in a loop.
pub struct World {
    config: WorldConfig,
    capacity: ChunkCapacity,
    /// `None` only while the chunk is out in a job.
    chunks: Vec<Option<Box<Chunk>>>,
    catalog: BlockCatalog,
    player_position: Vec3,
    ids: Arc<dyn IdentitySource>,
    scheduler: Scheduler<ChunkJob>,
    done_tx: Sender<ChunkReturn>,
    done_rx: Receiver<ChunkReturn>,
    tick_count: u64,
    built: bool,
    poisoned: bool,
}

impl World {
    /// Creates an empty world and starts its worker pool.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::Config` if the config is invalid, or
    /// `WorldError::Scheduler` if the workers cannot start.
    pub fn new(config: WorldConfig, ids: Arc<dyn IdentitySource>) -> WorldResult<Self> {
        config.validate()?;
        let capacity = config.chunk_capacity()?;
        let scheduler = Scheduler::new(config.worker_count, config.queue_capacity())?;
        let (done_tx, done_rx) = bounded(config.chunk_count);

        Ok(Self {
            capacity,
            chunks: Vec::with_capacity(config.chunk_count),
            catalog: BlockCatalog::default(),
            player_position: config.player_start,
            ids,
            scheduler,
            done_tx,
            done_rx,
            tick_count: 0,
            built: false,
            poisoned: false,
            config,
        })
    }

    /// Creates a world with its own identity counter starting at zero.
    ///
    /// # Errors
    ///
    /// As [`World::new`].
    pub fn with_config(config: WorldConfig) -> WorldResult<Self> {
        Self::new(config, Arc::new(AtomicIdentity::new()))
    }

    /// Builds the block catalog and every chunk.
    ///
    /// Each chunk takes a distinct identity and sits at `(id, 0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::AlreadyBuilt` on a second call.
    pub fn build_initial(&mut self) -> WorldResult<()> {
        if self.built {
            return Err(WorldError::AlreadyBuilt);
        }

        self.catalog = BlockCatalog::standard(self.config.block_catalog_size);
        for _ in 0..self.config.chunk_count {
            let origin = Chunk::origin_for(self.ids.next_id());
            self.chunks.push(Some(Box::new(Chunk::new(origin, self.capacity))));
        }
        self.built = true;

        tracing::info!(
            chunks = self.chunks.len(),
            blocks_per_chunk = self.capacity.blocks(),
            entities_per_chunk = self.capacity.entities(),
            catalog = self.catalog.len(),
            "world built"
        );
        Ok(())
    }

    /// Runs one tick and waits for every chunk to finish.
    ///
    /// # Errors
    ///
    /// - `WorldError::NotBuilt` before `build_initial`
    /// - `WorldError::Scheduler` if a chunk task panicked
    /// - `WorldError::ChunkLost` if a chunk did not come back
    /// - `WorldError::Poisoned` on any call after one of the above
    pub fn tick(&mut self) -> WorldResult<TickReport> {
        if self.poisoned {
            return Err(WorldError::Poisoned);
        }
        if !self.built {
            return Err(WorldError::NotBuilt);
        }

        self.player_position += self.config.player_step;
        let player = self.player_position;
        let radius = self.config.recycle_radius();

        for (slot, cell) in self.chunks.iter_mut().enumerate() {
            let Some(chunk) = cell.take() else {
                self.poisoned = true;
                return Err(WorldError::ChunkLost { slot });
            };
            let job = ChunkJob {
                slot,
                chunk,
                player,
                radius,
                ids: Arc::clone(&self.ids),
                done: self.done_tx.clone(),
            };
            if let Err(err) = self.scheduler.submit(job) {
                // Jobs already queued must not outlive this call
                let _ = self.scheduler.await_idle();
                self.collect_returns();
                self.poisoned = true;
                return Err(err.into());
            }
        }

        let barrier = self.scheduler.await_idle();
        let recycled = self.collect_returns();

        if let Err(err) = barrier {
            self.poisoned = true;
            tracing::error!(tick = self.tick_count + 1, %err, "tick failed");
            return Err(err.into());
        }
        if let Some(slot) = self.chunks.iter().position(Option::is_none) {
            self.poisoned = true;
            return Err(WorldError::ChunkLost { slot });
        }

        self.tick_count += 1;
        tracing::debug!(tick = self.tick_count, recycled, "tick complete");

        Ok(TickReport {
            tick: self.tick_count,
            player_position: player,
            recycled,
        })
    }

    /// Puts returned chunks back into their slots. Returns how many recycled.
    fn collect_returns(&mut self) -> usize {
        let mut recycled = 0;
        for ret in self.done_rx.try_iter() {
            recycled += usize::from(ret.recycled);
            self.chunks[ret.slot] = Some(ret.chunk);
        }
        recycled
    }

    /// Every chunk, in slot order.
    ///
    /// A poisoned world may have lost chunks in the failed tick; those slots
    /// are skipped, so this can yield fewer than [`World::chunk_count`]
    /// items. Check [`World::is_poisoned`] first when the count matters.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter().filter_map(Option::as_deref)
    }

    /// Chunk in `slot`, if any. `None` for a slot lost by a failed tick.
    #[must_use]
    pub fn chunk(&self, slot: usize) -> Option<&Chunk> {
        self.chunks.get(slot).and_then(Option::as_deref)
    }

    /// Number of chunk slots, including any lost by a failed tick.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The static block catalog (empty before `build_initial`).
    #[must_use]
    pub fn block_catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    /// Current player position.
    #[must_use]
    pub const fn player_position(&self) -> Vec3 {
        self.player_position
    }

    /// Moves the player. Takes effect from the next tick.
    pub fn set_player_position(&mut self, position: Vec3) {
        self.player_position = position;
    }

    /// Completed ticks.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The config this world was built from.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Whether `build_initial` has run.
    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.built
    }

    /// Whether a failed tick has poisoned the world.
    #[must_use]
    pub const fn is_poisoned(&self) -> bool {
        self.poisoned
    }
}

//! # Concurrency Primitives
//!
//! No per-chunk locks. Exactly two things are shared between workers:
//!
//! ```text
//! IdentitySource:  atomic counter, hit once per recycle
//! Scheduler:       job queue in, idle barrier out
//! ```
//!
//! Chunk state itself is never shared: a chunk is moved into its job and
//! moved back, so the type system enforces one writer per chunk per tick.

mod identity;
mod scheduler;

pub use identity::{AtomicIdentity, IdentitySource};
pub use scheduler::{Job, Scheduler};

//! # CHUNKMILL
//!
//! The harness around the engine core.
//!
//! ```text
//! ┌──────────────┐   tick()   ┌──────────────────────────────┐
//! │   TickLoop   │ ─────────> │ chunkmill_core::World        │
//! │  (pacing +   │ <───────── │  player, chunks, scheduler   │
//! │   stats)     │  report    └──────────────────────────────┘
//! └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - `tick`: Frame pacing and tick timing statistics

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod tick;

pub use chunkmill_core as core;
pub use chunkmill_shared as shared;

pub use tick::{TickLoop, TickStats};

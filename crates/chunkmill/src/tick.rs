//! # Tick Loop
//!
//! Fixed-budget pacing for the outer loop, plus timing statistics.
//!
//! ## Design
//!
//! Each iteration measures the world tick, then sleeps away whatever is left
//! of the frame budget. A tick that overruns the budget is counted as late
//! and the next one starts immediately.

use std::time::{Duration, Instant};

use chunkmill_shared::TICK_BUDGET_MS;

/// Tick timing statistics.
#[derive(Clone, Copy, Debug)]
pub struct TickStats {
    /// Minimum tick duration observed.
    pub min_tick_us: u64,
    /// Maximum tick duration observed.
    pub max_tick_us: u64,
    /// Average tick duration (rolling).
    pub avg_tick_us: u64,
    /// Mean tick duration over every measured tick.
    pub mean_tick_us: f64,
    /// Number of late ticks (took longer than budget).
    pub late_ticks: u64,
    /// Total ticks measured.
    pub total_ticks: u64,
}

impl Default for TickStats {
    fn default() -> Self {
        Self {
            min_tick_us: u64::MAX,
            max_tick_us: 0,
            avg_tick_us: 0,
            mean_tick_us: 0.0,
            late_ticks: 0,
            total_ticks: 0,
        }
    }
}

impl TickStats {
    #[allow(clippy::cast_precision_loss)]
    fn record(&mut self, duration_us: u64, late: bool) {
        self.total_ticks += 1;
        self.min_tick_us = self.min_tick_us.min(duration_us);
        self.max_tick_us = self.max_tick_us.max(duration_us);

        // Rolling average
        self.avg_tick_us = if self.total_ticks == 1 {
            duration_us
        } else {
            (self.avg_tick_us * 15 + duration_us) / 16
        };
        self.mean_tick_us += (duration_us as f64 - self.mean_tick_us) / self.total_ticks as f64;

        if late {
            self.late_ticks += 1;
        }
    }
}

/// Fixed-budget tick pacer.
pub struct TickLoop {
    /// Budget for one tick.
    budget: Duration,
    /// Start of the tick in progress.
    tick_start: Option<Instant>,
    /// Total ticks executed.
    tick_count: u64,
    stats: TickStats,
}

impl TickLoop {
    /// Creates a pacer with the given per-tick budget.
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            tick_start: None,
            tick_count: 0,
            stats: TickStats::default(),
        }
    }

    /// Marks the start of a tick.
    pub fn begin_tick(&mut self) {
        self.tick_count += 1;
        self.tick_start = Some(Instant::now());
    }

    /// Marks the end of a tick and records its duration.
    ///
    /// Returns the measured duration, or zero if no tick was begun.
    pub fn end_tick(&mut self) -> Duration {
        let Some(start) = self.tick_start.take() else {
            return Duration::ZERO;
        };
        let duration = start.elapsed();
        let duration_us = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        self.stats.record(duration_us, duration > self.budget);
        duration
    }

    /// Sleeps for the part of the budget `elapsed` did not use.
    pub fn wait_remaining(&self, elapsed: Duration) {
        if let Some(remaining) = self.budget.checked_sub(elapsed) {
            if !remaining.is_zero() {
                std::thread::sleep(remaining);
            }
        }
    }

    /// Returns the current tick count.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Returns tick statistics.
    #[must_use]
    pub const fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Returns the per-tick budget.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Resets statistics.
    pub fn reset_stats(&mut self) {
        self.stats = TickStats::default();
    }
}

impl Default for TickLoop {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_BUDGET_MS))
    }
}

//! # Scheduler
//!
//! Fixed pool of worker threads with a tick barrier.
//!
//! ## Architecture
//!
//! ```text
//!   submit() ──> [bounded job queue] ──> worker 0 ──┐
//!                                   ──> worker 1 ──┼──> pending -= 1 ──> await_idle() wakes
//!                                   ──> worker N ──┘
//! ```
//!
//! - The queue is bounded. `submit` blocks while it is full (backpressure).
//! - Every job runs under `catch_unwind`. A panic is recorded and returned by
//!   the next `await_idle`; the worker survives and keeps draining the queue.
//! - Jobs are sent by value. A concrete job type travels without boxing, so
//!   dispatch does not allocate.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex};

use crate::error::{SchedulerError, SchedulerResult};

/// A unit of work for the pool.
pub trait Job: Send + 'static {
    /// Runs the job to completion on a worker thread.
    fn run(self);
}

impl<F> Job for F
where
    F: FnOnce() + Send + 'static,
{
    #[inline]
    fn run(self) {
        self();
    }
}

/// Failures recorded since the last barrier.
#[derive(Default)]
struct FailureLog {
    failed: usize,
    first_message: Option<String>,
}

/// State shared between the submitter and the workers.
struct Shared {
    /// Jobs submitted but not yet finished.
    pending: Mutex<usize>,
    /// Signalled when `pending` drops to zero.
    idle: Condvar,
    failures: Mutex<FailureLog>,
}

impl Shared {
    fn finish_one(&self) {
        let mut pending = self.pending.lock();
        *pending -= 1;
        if *pending == 0 {
            self.idle.notify_all();
        }
    }

    fn record_failure(&self, payload: &(dyn Any + Send)) {
        let message = panic_message(payload);
        tracing::error!(%message, "scheduled task panicked");
        let mut log = self.failures.lock();
        log.failed += 1;
        if log.first_message.is_none() {
            log.first_message = Some(message);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// A fixed-size worker pool.
///
/// Owned by whoever created it; dropping it closes the queue, lets the
/// workers drain what is left, and joins them.
pub struct Scheduler<J: Job> {
    sender: Option<Sender<J>>,
    workers: Vec<JoinHandle<()>>,
    shared: Arc<Shared>,
}

impl<J: Job> Scheduler<J> {
    /// Spawns `worker_count` workers behind a queue of `queue_capacity` jobs.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::NoWorkers` if `worker_count` is zero, or
    /// `SchedulerError::Spawn` if a thread cannot be started.
    pub fn new(worker_count: usize, queue_capacity: usize) -> SchedulerResult<Self> {
        if worker_count == 0 {
            return Err(SchedulerError::NoWorkers);
        }

        let (sender, receiver) = bounded::<J>(queue_capacity.max(1));
        let shared = Arc::new(Shared {
            pending: Mutex::new(0),
            idle: Condvar::new(),
            failures: Mutex::new(FailureLog::default()),
        });

        let mut scheduler = Self {
            sender: Some(sender),
            workers: Vec::with_capacity(worker_count),
            shared,
        };

        for index in 0..worker_count {
            let receiver = receiver.clone();
            let shared = Arc::clone(&scheduler.shared);
            // On error `scheduler` drops here and joins the workers already started.
            let handle = thread::Builder::new()
                .name(format!("chunkmill-worker-{index}"))
                .spawn(move || Self::worker_loop(&receiver, &shared))?;
            scheduler.workers.push(handle);
        }

        tracing::info!(worker_count, queue_capacity, "scheduler started");
        Ok(scheduler)
    }

    fn worker_loop(receiver: &Receiver<J>, shared: &Shared) {
        while let Ok(job) = receiver.recv() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| job.run())) {
                shared.record_failure(payload.as_ref());
            }
            shared.finish_one();
        }
    }

    /// Enqueues a job.
    ///
    /// Returns as soon as the job is queued. Blocks while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Disconnected` if the pool has shut down.
    pub fn submit(&self, job: J) -> SchedulerResult<()> {
        let sender = self.sender.as_ref().ok_or(SchedulerError::Disconnected)?;
        *self.shared.pending.lock() += 1;
        if sender.send(job).is_err() {
            self.shared.finish_one();
            return Err(SchedulerError::Disconnected);
        }
        Ok(())
    }

    /// Blocks until every job submitted so far has finished.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::TaskPanicked` if any job panicked since the
    /// previous barrier. The failure record is cleared either way.
    pub fn await_idle(&self) -> SchedulerResult<()> {
        {
            let mut pending = self.shared.pending.lock();
            while *pending > 0 {
                self.shared.idle.wait(&mut pending);
            }
        }

        let log = std::mem::take(&mut *self.shared.failures.lock());
        if log.failed > 0 {
            return Err(SchedulerError::TaskPanicked {
                failed: log.failed,
                message: log.first_message.unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Number of worker threads.
    #[inline]
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Jobs submitted but not yet finished.
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.shared.pending.lock()
    }

    /// Closes the queue and joins every worker. Idempotent.
    pub fn shutdown(&mut self) {
        if self.sender.take().is_none() && self.workers.is_empty() {
            return;
        }
        for handle in self.workers.drain(..) {
            // Workers catch job panics, so join only fails on a bug in the loop itself.
            let _ = handle.join();
        }
        tracing::info!("scheduler stopped");
    }
}

impl<J: Job> Drop for Scheduler<J> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    type BoxedJob = Box<dyn FnOnce() + Send>;

    #[test]
    fn test_zero_workers_rejected() {
        let result = Scheduler::<fn()>::new(0, 4);
        assert!(matches!(result, Err(SchedulerError::NoWorkers)));
    }

    #[test]
    fn test_await_idle_waits_for_all_jobs() {
        let scheduler = Scheduler::new(4, 16).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            scheduler
                .submit(move || {
                    thread::sleep(Duration::from_micros(50));
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        scheduler.await_idle().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 100);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.worker_count(), 4);
    }

    #[test]
    fn test_await_idle_with_nothing_submitted() {
        let scheduler = Scheduler::<fn()>::new(1, 1).unwrap();
        scheduler.await_idle().unwrap();
    }

    #[test]
    fn test_panic_is_surfaced_not_swallowed() {
        let scheduler: Scheduler<BoxedJob> = Scheduler::new(2, 8).unwrap();
        let survivors = Arc::new(AtomicUsize::new(0));

        scheduler.submit(Box::new(|| panic!("chunk exploded"))).unwrap();
        for _ in 0..5 {
            let survivors = Arc::clone(&survivors);
            scheduler
                .submit(Box::new(move || {
                    survivors.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        }

        match scheduler.await_idle() {
            Err(SchedulerError::TaskPanicked { failed, message }) => {
                assert_eq!(failed, 1);
                assert_eq!(message, "chunk exploded");
            }
            other => panic!("expected TaskPanicked, got {other:?}"),
        }
        assert_eq!(survivors.load(Ordering::SeqCst), 5);

        // Record is cleared and the pool still works
        scheduler.submit(Box::new(|| {})).unwrap();
        scheduler.await_idle().unwrap();
    }

    #[test]
    fn test_full_queue_blocks_submitter() {
        let scheduler: Scheduler<BoxedJob> = Scheduler::new(1, 1).unwrap();
        let (gate_tx, gate_rx) = bounded::<()>(0);
        let third_queued = AtomicBool::new(false);

        thread::scope(|scope| {
            // Occupies the only worker until the gate opens
            scheduler
                .submit(Box::new(move || {
                    let _ = gate_rx.recv();
                }))
                .unwrap();
            // Give the worker time to pick it up, then fill the queue
            thread::sleep(Duration::from_millis(50));
            scheduler.submit(Box::new(|| {})).unwrap();

            scope.spawn(|| {
                scheduler.submit(Box::new(|| {})).unwrap();
                third_queued.store(true, Ordering::SeqCst);
            });

            thread::sleep(Duration::from_millis(100));
            assert!(!third_queued.load(Ordering::SeqCst));

            gate_tx.send(()).unwrap();
        });

        assert!(third_queued.load(Ordering::SeqCst));
        scheduler.await_idle().unwrap();
    }

    #[test]
    fn test_submit_after_shutdown() {
        let mut scheduler = Scheduler::<fn()>::new(1, 1).unwrap();
        scheduler.shutdown();
        assert!(matches!(
            scheduler.submit(|| {}),
            Err(SchedulerError::Disconnected)
        ));
        scheduler.shutdown();
    }
}

//! # Identity Source
//!
//! Hands out unique chunk identities. The world draws one per chunk at
//! build time and one per recycle; workers draw concurrently.

use std::sync::atomic::{AtomicU64, Ordering};

/// A process-scoped source of unique, increasing chunk identities.
///
/// Injected into the `World` so tests can substitute their own.
pub trait IdentitySource: Send + Sync {
    /// Returns the next identity. Never blocks.
    ///
    /// Implementations must never return the same value twice.
    fn next_id(&self) -> u64;
}

/// Lock-free `IdentitySource` backed by an `AtomicU64`.
#[derive(Debug, Default)]
pub struct AtomicIdentity {
    next: AtomicU64,
}

impl AtomicIdentity {
    /// Counter starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Counter whose first identity is `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The identity the next call would return.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Acquire)
    }
}

impl IdentitySource for AtomicIdentity {
    /// # Panics
    ///
    /// Panics when the 64-bit counter is exhausted. Uniqueness cannot be kept
    /// past that point, so there is nothing to recover.
    #[inline]
    fn next_id(&self) -> u64 {
        match self
            .next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| v.checked_add(1))
        {
            Ok(id) => id,
            Err(last) => panic!("identity source exhausted at {last}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sequential_ids() {
        let ids = AtomicIdentity::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn test_concurrent_ids_are_contiguous_and_unique() {
        let ids = Arc::new(AtomicIdentity::starting_at(1_000));
        let num_threads = 8;
        let per_thread = 5_000;

        let handles: Vec<_> = (0..num_threads)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || {
                    let mut local = Vec::with_capacity(per_thread);
                    let mut last = None;
                    for _ in 0..per_thread {
                        let id = ids.next_id();
                        // Strictly increasing per caller
                        assert!(last.map_or(true, |prev| id > prev));
                        last = Some(id);
                        local.push(id);
                    }
                    local
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }

        let total = (num_threads * per_thread) as u64;
        assert_eq!(seen.len() as u64, total);
        assert_eq!(seen.iter().min(), Some(&1_000));
        assert_eq!(seen.iter().max(), Some(&(1_000 + total - 1)));
    }

    #[test]
    #[should_panic(expected = "identity source exhausted")]
    fn test_exhaustion_is_fatal() {
        let ids = AtomicIdentity::starting_at(u64::MAX);
        let _ = ids.next_id();
    }
}

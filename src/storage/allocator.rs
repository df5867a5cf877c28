//! ID Allocator
//!
//! Hands out unique, strictly increasing record IDs.
//!
//! ## Lifecycle
//! 1. Constructed during `RecordStore::open`
//! 2. Seeded once with the highest ID found on disk
//! 3. Shared by every `create` call (lock-free)

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{RegistryError, Result};

/// Monotonic ID counter
///
/// ## Concurrency:
/// - `allocate` takes `&self` and is a single atomic compare-and-swap loop,
///   so N concurrent callers receive exactly `{start + 1, ..., start + N}`
/// - `initialize` takes `&mut self`, so it can never race an `allocate`
///
/// IDs are never handed back. If the caller fails to persist the record the
/// ID is still consumed and a gap appears on disk.
#[derive(Debug, Default)]
pub struct IdAllocator {
    /// Last ID handed out (or the seed, before the first allocation)
    last: AtomicU64,
}

impl IdAllocator {
    /// Create an allocator whose first ID will be 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the counter to the highest ID already in use
    pub fn initialize(&mut self, max_existing: u64) {
        *self.last.get_mut() = max_existing;
    }

    /// Atomically increment the counter and return the new value
    ///
    /// Fails with `IdSpaceExhausted` once `u64::MAX` has been handed out;
    /// the counter never wraps back to 0.
    pub fn allocate(&self) -> Result<u64> {
        self.last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .map(|previous| previous + 1)
            .map_err(|last| RegistryError::IdSpaceExhausted { last })
    }

    /// Last ID handed out, or the seed if nothing was allocated yet
    pub fn last_allocated(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

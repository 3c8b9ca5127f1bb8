//! Engine options consumed by the core.
//!
//! The text front-end owns option parsing; the core only reads three
//! typed values from a thread-safe store: transposition table size,
//! worker thread count (reserved for a future lazy-SMP search), and the
//! move overhead subtracted from soft time budgets.

use std::sync::Arc;

use parking_lot::RwLock;

/// Typed option values with their invariants enforced on write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    hash_mb: usize,
    threads: usize,
    move_overhead_ms: u64,
}

impl EngineOptions {
    pub const DEFAULT_HASH_MB: usize = 16;

    /// Transposition table size in megabytes, always at least 1.
    #[inline]
    #[must_use]
    pub fn hash_mb(&self) -> usize {
        self.hash_mb
    }

    /// Search worker count, always at least 1.
    #[inline]
    #[must_use]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Milliseconds reserved for communication latency.
    #[inline]
    #[must_use]
    pub fn move_overhead_ms(&self) -> u64 {
        self.move_overhead_ms
    }

    pub fn set_hash_mb(&mut self, mb: usize) {
        self.hash_mb = mb.max(1);
    }

    pub fn set_threads(&mut self, threads: usize) {
        self.threads = threads.max(1);
    }

    pub fn set_move_overhead_ms(&mut self, ms: u64) {
        self.move_overhead_ms = ms;
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            hash_mb: Self::DEFAULT_HASH_MB,
            threads: 1,
            move_overhead_ms: 30,
        }
    }
}

/// Thread-safe handle to the option store. The front-end writes on
/// `setoption`; the core reads when configuring a search.
#[derive(Clone, Debug, Default)]
pub struct SharedOptions(Arc<RwLock<EngineOptions>>);

impl SharedOptions {
    #[must_use]
    pub fn new() -> Self {
        SharedOptions::default()
    }

    /// Snapshot the current option values.
    #[must_use]
    pub fn get(&self) -> EngineOptions {
        *self.0.read()
    }

    /// Update option values under the write lock.
    pub fn update(&self, f: impl FnOnce(&mut EngineOptions)) {
        f(&mut self.0.write());
    }
}

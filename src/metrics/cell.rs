use std::sync::atomic::{AtomicU64, Ordering};

/// A metrics-only counter.
///
/// Backed by an `AtomicU64` because `get` records hits and misses while only
/// a shared lock is held, so several readers may bump the same counter.
/// Relaxed ordering: counters are observational and never gate correctness.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(AtomicU64);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

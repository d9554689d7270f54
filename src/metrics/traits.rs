//! # Metrics Traits
//!
//! Recording, snapshotting and export are split into small traits so the
//! engine only ever writes counters and monitoring code only ever reads them.
//!
//! ```text
//!   ┌─────────────────────────────┐
//!   │     CoreMetricsRecorder     │   get hit/miss, insert, evict, clear
//!   └──────────────┬──────────────┘
//!                  ▼
//!   ┌─────────────────────────────┐
//!   │     LruMetricsRecorder      │   replace, remove, producer, repair,
//!   │                             │   rebase, resize, pop_lru
//!   └─────────────────────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! Every recorder method takes `&self`: counters are atomics because hits and
//! misses are recorded under a shared lock.

/// Common counters for any cache.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&self);
    fn record_get_miss(&self);
    fn record_insert_call(&self);
    fn record_insert_new(&self);
    fn record_insert_update(&self);
    fn record_evicted_entry(&self);
    fn record_clear(&self);
}

/// Counters specific to the tick-window LRU engine.
pub trait LruMetricsRecorder: CoreMetricsRecorder {
    fn record_remove_call(&self);
    fn record_remove_found(&self);
    fn record_producer_call(&self);
    fn record_producer_error(&self);
    fn record_pop_lru_found(&self);
    fn record_repair(&self);
    fn record_rebase(&self);
    fn record_resize(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}

//! Operation counters for the LRU engine (feature `metrics`).
//!
//! Recording, snapshotting and export are separate concerns:
//! [`LruMetricsRecorder`](traits::LruMetricsRecorder) writes counters,
//! [`MetricsSnapshotProvider`](traits::MetricsSnapshotProvider) reads them
//! into a plain [`LruMetricsSnapshot`](snapshot::LruMetricsSnapshot), and
//! [`MetricsExporter`](traits::MetricsExporter) publishes a snapshot.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

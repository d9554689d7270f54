//! tickcache: a small fixed-capacity LRU cache over flat parallel columns,
//! with a logical-clock recency window and an optional `RwLock` wrapper.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;

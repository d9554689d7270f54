pub use crate::builder::LruBuilder;
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "concurrency")]
pub use crate::policy::lru::ConcurrentLruCache;
pub use crate::policy::lru::{EvictFn, LruCore};
#[cfg(feature = "concurrency")]
pub use crate::traits::ConcurrentCache;
pub use crate::traits::{LruCacheTrait, RecencyCache};

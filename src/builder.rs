//! Builder for LRU caches.
//!
//! Collects the capacity and an optional eviction callback, then produces
//! either the single-threaded [`LruCore`] or the lock-wrapped
//! [`ConcurrentLruCache`](crate::policy::lru::ConcurrentLruCache).
//!
//! ## Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use tickcache::builder::LruBuilder;
//!
//! let evictions = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&evictions);
//!
//! let mut cache = LruBuilder::new(2)
//!     .on_evict(move |_key: u64, _value: String| {
//!         counter.fetch_add(1, Ordering::Relaxed);
//!     })
//!     .build();
//!
//! cache.set(1, "one".to_string());
//! cache.set(2, "two".to_string());
//! cache.set(3, "three".to_string());
//! assert_eq!(evictions.load(Ordering::Relaxed), 1);
//! ```

use std::fmt;

use crate::error::ConfigError;
#[cfg(feature = "concurrency")]
use crate::policy::lru::ConcurrentLruCache;
use crate::policy::lru::{EvictFn, LruCore};

/// Builder for [`LruCore`] and [`ConcurrentLruCache`].
pub struct LruBuilder<K, V> {
    capacity: usize,
    on_evict: Option<EvictFn<K, V>>,
}

impl<K, V> LruBuilder<K, V>
where
    K: Eq,
{
    /// Starts a builder for a cache of `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            on_evict: None,
        }
    }

    /// Overrides the capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the callback that receives evicted, removed and overwritten
    /// entries. Replaces any earlier callback.
    pub fn on_evict<F>(mut self, on_evict: F) -> Self
    where
        F: Fn(K, V) + Send + Sync + 'static,
    {
        self.on_evict = Some(Box::new(on_evict));
        self
    }

    /// Builds a single-threaded cache.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero. Use [`try_build`](Self::try_build)
    /// to get a [`ConfigError`] instead.
    pub fn build(self) -> LruCore<K, V> {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible [`build`](Self::build).
    ///
    /// ```
    /// use tickcache::builder::LruBuilder;
    ///
    /// assert!(LruBuilder::<u32, u32>::new(0).try_build().is_err());
    /// ```
    pub fn try_build(self) -> Result<LruCore<K, V>, ConfigError> {
        LruCore::from_config(self.capacity, self.on_evict)
    }

    /// Builds a thread-safe cache.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero.
    #[cfg(feature = "concurrency")]
    pub fn build_concurrent(self) -> ConcurrentLruCache<K, V>
    where
        K: Send + Sync,
        V: Send + Sync,
    {
        self.build().into()
    }

    /// Fallible [`build_concurrent`](Self::build_concurrent).
    #[cfg(feature = "concurrency")]
    pub fn try_build_concurrent(self) -> Result<ConcurrentLruCache<K, V>, ConfigError>
    where
        K: Send + Sync,
        V: Send + Sync,
    {
        self.try_build().map(ConcurrentLruCache::from)
    }
}

impl<K, V> fmt::Debug for LruBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruBuilder")
            .field("capacity", &self.capacity)
            .field("on_evict", &self.on_evict.is_some())
            .finish()
    }
}

//! # Cache Traits
//!
//! The single-threaded cache surface is split the same way as the engine's
//! responsibilities: [`RecencyCache`] carries every keyed operation, and
//! [`LruCacheTrait`] adds the operations that only make sense for a
//! recency-ordered policy.
//!
//! ```text
//!   ┌──────────────────────────────────────────────┐
//!   │              RecencyCache<K, V>              │
//!   │                                              │
//!   │  len / cap / capacity / contains             │
//!   │  get(&mut) → Option<&V>     (refreshes)      │
//!   │  peek(&)   → Option<&V>     (does not)       │
//!   │  get_or_set(K, producer) → Result<&V, E>     │
//!   │  set / replace / remove → bool               │
//!   │  remove_all / reset / resize                 │
//!   └──────────────────────┬───────────────────────┘
//!                          ▼
//!   ┌──────────────────────────────────────────────┐
//!   │              LruCacheTrait<K, V>             │
//!   │                                              │
//!   │  pop_lru() → (K, V)                          │
//!   │  peek_lru() → (&K, &V)                       │
//!   │  touch(&K) → bool                            │
//!   │  recency_rank(&K) → usize                    │
//!   └──────────────────────────────────────────────┘
//!
//!   ConcurrentCache: marker (Send + Sync) for lock-wrapped caches whose
//!   methods take &self.
//! ```
//!
//! ## Eviction notification
//!
//! Caches implementing these traits may carry an `on_evict(key, value)`
//! callback. It fires for capacity evictions, [`RecencyCache::remove`],
//! [`RecencyCache::remove_all`], shrinking [`RecencyCache::resize`], and for
//! the displaced value of [`RecencyCache::replace`]. It never fires for
//! [`RecencyCache::reset`] or [`LruCacheTrait::pop_lru`] (the caller receives
//! the pair instead).
//!
//! ## Example Usage
//!
//! ```
//! use tickcache::policy::lru::LruCore;
//! use tickcache::traits::{LruCacheTrait, RecencyCache};
//!
//! fn warm<C: RecencyCache<u64, String>>(cache: &mut C, rows: &[(u64, &str)]) {
//!     for (key, value) in rows {
//!         cache.set(*key, value.to_string());
//!     }
//! }
//!
//! let mut cache = LruCore::new(2);
//! warm(&mut cache, &[(1, "a"), (2, "b")]);
//! cache.touch(&1);
//! assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some(2));
//! ```

use crate::error::ConfigError;

/// Keyed operations shared by every recency cache.
pub trait RecencyCache<K, V> {
    /// Number of live entries.
    fn len(&self) -> usize;

    /// `true` when no entries are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of occupied slots. Mirrors [`len`](Self::len); the configured
    /// maximum is [`capacity`](Self::capacity).
    fn cap(&self) -> usize;

    /// Configured maximum number of entries.
    fn capacity(&self) -> usize;

    /// Existence check. Does not refresh recency.
    fn contains(&self, key: &K) -> bool;

    /// Returns the value and marks the entry most recently used.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns the value without touching recency.
    fn peek(&self, key: &K) -> Option<&V>;

    /// On hit, behaves as [`get`](Self::get). On miss, calls `producer`;
    /// its error is returned verbatim and nothing is inserted, otherwise the
    /// produced value is inserted as most recently used.
    fn get_or_set<E, F>(&mut self, key: K, producer: F) -> Result<&V, E>
    where
        F: FnOnce(&K) -> Result<V, E>;

    /// Inserts only when `key` is absent. Returns `true` if inserted.
    /// An existing entry keeps its value and its recency.
    fn set(&mut self, key: K, value: V) -> bool;

    /// Overwrites (notifying with the old value) or inserts. Returns `true`
    /// if the key existed.
    fn replace(&mut self, key: K, value: V) -> bool;

    /// Removes the entry, notifying `on_evict`. Returns `true` if it existed.
    fn remove(&mut self, key: &K) -> bool;

    /// Notifies `on_evict` for every entry, then clears.
    fn remove_all(&mut self);

    /// Clears without notification.
    fn reset(&mut self);

    /// Changes the maximum capacity, evicting oldest entries first when
    /// shrinking below the current length.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a capacity of zero; the cache is unchanged.
    fn resize(&mut self, capacity: usize) -> Result<(), ConfigError>;
}

/// Recency-specific operations.
pub trait LruCacheTrait<K, V>: RecencyCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without touching it.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` most recently used. Returns `false` if absent.
    fn touch(&mut self, key: &K) -> bool;

    /// Position in recency order, 0 being most recently used.
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// Marker for caches that are safe to share across threads.
///
/// Implementors serialize access internally; their operations take `&self`.
pub trait ConcurrentCache: Send + Sync {}

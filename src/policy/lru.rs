//! Fixed-capacity LRU cache over flat parallel columns.
//!
//! Entries live in three position-aligned columns: keys, values and the
//! recency ticks of a [`RecencyWindow`]. There is no hash map and no linked
//! list; lookups are a linear scan over the key column and recency order is
//! derived from the ticks.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                          LruCore<K, V> Layout                         │
//! │                                                                       │
//! │   slot:       0        1        2        3                            │
//! │   keys:    [ "a" ]  [ "b" ]  [ "c" ]  [ "d" ]     Vec<K>              │
//! │   values:  [  1  ]  [  2  ]  [  3  ]  [  4  ]     Vec<V>              │
//! │   ticks:   [  5  ]  [  3  ]  [  6  ]  [  4  ]     RecencyWindow       │
//! │                                                                       │
//! │   clock = 7, len = 4  →  window 3..=6                                 │
//! │   LRU = slot holding tick 3 = "b"      MRU = slot holding 6 = "c"     │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! ```text
//!   get("a")        scan keys → slot 0, stamp fresh tick, close hole
//!   set("e", 5)     full: evict slot holding clock - len, then append
//!   remove("c")     swap_remove slot 2 in all three columns, close hole
//!   iter_asc()      for t in oldest..clock: yield slot holding t
//! ```
//!
//! ## Performance
//!
//! | Operation        | Cost                                  |
//! |------------------|---------------------------------------|
//! | `contains`/`peek`| O(n) key scan                         |
//! | `get`/`touch`    | O(n) key scan + O(n) hole close       |
//! | `set`/`replace`  | O(n), eviction included               |
//! | `remove`         | O(n), swap-remove                     |
//! | `iter`           | O(n)                                  |
//! | `iter_asc/desc`  | O(n²), one tick lookup per step       |
//!
//! Intended for small capacities where a scan over contiguous memory beats a
//! hash lookup plus pointer chasing.
//!
//! ## Eviction notification
//!
//! An optional `on_evict(key, value)` callback fires synchronously for
//! capacity evictions, [`LruCore::remove`], [`LruCore::remove_all`],
//! shrinking [`LruCore::resize`], and with the displaced value on
//! [`LruCore::replace`]. [`LruCore::reset`] and [`LruCore::pop_lru`] never
//! call it.
//!
//! ## Thread Safety
//!
//! - [`LruCore`]: single-threaded; mutations take `&mut self`.
//! - [`ConcurrentLruCache`]: one `parking_lot::RwLock` around an `LruCore`.
//!   `get` runs under the **read lock** and stamps recency through atomics;
//!   every mutation, including `get_or_set` and its producer, runs under the
//!   **write lock**.
//!
//! ## Example Usage
//!
//! ```
//! use tickcache::policy::lru::LruCore;
//!
//! let mut cache = LruCore::new(2);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.get(&"a");
//! cache.set("c", 3);
//!
//! // "b" was least recently used
//! assert!(!cache.contains(&"b"));
//! let order: Vec<_> = cache.iter_asc().map(|(k, _)| *k).collect();
//! assert_eq!(order, vec!["a", "c"]);
//! ```

use std::fmt;
use std::iter::FusedIterator;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

use crate::ds::{RecencyWindow, Renumbering};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LruMetricsRecorder, MetricsReset, MetricsSnapshotProvider,
};
#[cfg(feature = "concurrency")]
use crate::traits::ConcurrentCache;
use crate::traits::{LruCacheTrait, RecencyCache};

/// Callback receiving entries that leave the cache or are overwritten.
pub type EvictFn<K, V> = Box<dyn Fn(K, V) + Send + Sync>;

/// Single-threaded LRU engine.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use tickcache::policy::lru::LruCore;
///
/// let evicted = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&evicted);
/// let mut cache = LruCore::with_on_evict(2, move |k, v| {
///     sink.lock().unwrap().push((k, v));
/// });
///
/// cache.set(1, "one");
/// cache.set(2, "two");
/// cache.replace(2, "TWO");
/// cache.set(3, "three");
///
/// assert_eq!(*evicted.lock().unwrap(), vec![(2, "two"), (1, "one")]);
/// ```
pub struct LruCore<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
    window: RecencyWindow,
    capacity: usize,
    on_evict: Option<EvictFn<K, V>>,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCore<K, V>
where
    K: Eq,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) to get a
    /// [`ConfigError`] instead.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible constructor.
    ///
    /// ```
    /// use tickcache::policy::lru::LruCore;
    ///
    /// assert!(LruCore::<u64, u64>::try_new(0).is_err());
    /// assert_eq!(LruCore::<u64, u64>::try_new(4).unwrap().capacity(), 4);
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::from_config(capacity, None)
    }

    /// Creates a cache that reports departing entries to `on_evict`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_on_evict<F>(capacity: usize, on_evict: F) -> Self
    where
        F: Fn(K, V) + Send + Sync + 'static,
    {
        match Self::from_config(capacity, Some(Box::new(on_evict))) {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    pub(crate) fn from_config(
        capacity: usize,
        on_evict: Option<EvictFn<K, V>>,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            window: RecencyWindow::with_capacity(capacity),
            capacity,
            on_evict,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        })
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of occupied slots. Mirrors [`len`](Self::len).
    #[inline]
    pub fn cap(&self) -> usize {
        self.keys.len()
    }

    /// Configured maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Existence check that leaves recency alone.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(slot) = self.position(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        let renumbering = self.window.touch(slot);
        self.note_renumbering(renumbering);
        Some(&self.values[slot])
    }

    /// Returns the value for `key` without touching recency.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.position(key).map(|slot| &self.values[slot])
    }

    /// Returns the cached value, or computes, inserts and returns it.
    ///
    /// On a miss `producer` is called with the key. An `Err` is handed back
    /// unchanged and the cache is not modified; an `Ok` value is inserted as
    /// most recently used, evicting the oldest entry first if full.
    ///
    /// ```
    /// use tickcache::policy::lru::LruCore;
    ///
    /// let mut cache = LruCore::new(4);
    /// let v = cache.get_or_set(3, |k| Ok::<_, String>(k * 10)).unwrap();
    /// assert_eq!(*v, 30);
    ///
    /// let err = cache.get_or_set(4, |_| Err("backend down".to_string()));
    /// assert_eq!(err.unwrap_err(), "backend down");
    /// assert!(!cache.contains(&4));
    /// ```
    pub fn get_or_set<E, F>(&mut self, key: K, producer: F) -> Result<&V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        if let Some(slot) = self.position(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_hit();
            let renumbering = self.window.touch(slot);
            self.note_renumbering(renumbering);
            return Ok(&self.values[slot]);
        }

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_get_miss();
            self.metrics.record_producer_call();
        }

        let value = match producer(&key) {
            Ok(value) => value,
            Err(err) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_producer_error();
                return Err(err);
            },
        };

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_insert_call();
            self.metrics.record_insert_new();
        }

        let slot = self.append(key, value);
        Ok(&self.values[slot])
    }

    /// Inserts `key` only if it is absent. Returns `true` when inserted.
    ///
    /// An existing entry keeps both its value and its recency.
    pub fn set(&mut self, key: K, value: V) -> bool {
        if self.contains(&key) {
            return false;
        }

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_insert_call();
            self.metrics.record_insert_new();
        }

        self.append(key, value);
        true
    }

    /// Inserts or overwrites `key`. Returns `true` if the key existed.
    ///
    /// An overwrite marks the entry most recently used and passes the key and
    /// the displaced value to `on_evict`.
    pub fn replace(&mut self, key: K, value: V) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(slot) = self.position(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let old = std::mem::replace(&mut self.values[slot], value);
            let renumbering = self.window.touch(slot);
            self.note_renumbering(renumbering);
            self.notify(key, old);
            return true;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        self.append(key, value);
        false
    }

    /// Removes `key`, passing it to `on_evict`. Returns `true` if it existed.
    pub fn remove(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let Some(slot) = self.position(key) else {
            return false;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        let (key, value) = self.take_slot(slot);
        self.notify(key, value);
        true
    }

    /// Passes every entry to `on_evict` in storage order, then empties the
    /// cache.
    pub fn remove_all(&mut self) {
        // Detach and clear first so a panicking callback leaves an empty,
        // consistent cache behind.
        let keys = std::mem::replace(&mut self.keys, Vec::with_capacity(self.capacity));
        let values = std::mem::replace(&mut self.values, Vec::with_capacity(self.capacity));
        self.clear_columns();
        debug!(count = keys.len(), "removed all entries");

        if let Some(on_evict) = &self.on_evict {
            for (key, value) in keys.into_iter().zip(values) {
                on_evict(key, value);
            }
        }
    }

    /// Empties the cache without calling `on_evict`.
    pub fn reset(&mut self) {
        let count = self.keys.len();
        self.clear_columns();
        debug!(count, "reset cache");
    }

    /// Changes the maximum number of entries.
    ///
    /// Shrinking below the current length evicts least recently used entries
    /// (through `on_evict`) until the cache fits. Recency of the survivors is
    /// preserved. Resizing to the current capacity does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a capacity of zero; the cache is unchanged.
    ///
    /// ```
    /// use tickcache::policy::lru::LruCore;
    ///
    /// let mut cache = LruCore::new(5);
    /// for k in 1..=5 {
    ///     cache.set(k, k);
    /// }
    /// cache.resize(3).unwrap();
    /// let keys: Vec<_> = cache.iter_asc().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![3, 4, 5]);
    /// assert!(cache.resize(0).is_err());
    /// ```
    pub fn resize(&mut self, capacity: usize) -> Result<(), ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if capacity == self.capacity {
            return Ok(());
        }

        let from = self.capacity;
        let mut evicted = 0usize;
        while self.keys.len() > capacity {
            if !self.evict_oldest() {
                break;
            }
            evicted += 1;
        }

        fit_column(&mut self.keys, capacity);
        fit_column(&mut self.values, capacity);
        self.window.resize_storage(capacity);
        self.capacity = capacity;

        #[cfg(feature = "metrics")]
        self.metrics.record_resize();

        debug!(from, to = capacity, evicted, "resized cache");
        Ok(())
    }

    /// Least recently used entry, without touching it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        let slot = self.oldest_slot()?;
        Some((&self.keys[slot], &self.values[slot]))
    }

    /// Removes and returns the least recently used entry.
    ///
    /// The caller receives the pair, so `on_evict` is not called.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.remove_oldest()?;

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_found();

        Some(entry)
    }

    /// Marks `key` most recently used. Returns `false` if absent.
    pub fn touch(&mut self, key: &K) -> bool {
        let Some(slot) = self.position(key) else {
            return false;
        };
        let renumbering = self.window.touch(slot);
        self.note_renumbering(renumbering);
        true
    }

    /// Position of `key` in recency order, 0 being most recently used.
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        self.position(key).map(|slot| self.window.rank(slot))
    }

    /// Entries in storage order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            core: self,
            cursor: Cursor::storage(self.keys.len()),
        }
    }

    /// Entries from least to most recently used.
    pub fn iter_asc(&self) -> Iter<'_, K, V> {
        Iter {
            core: self,
            cursor: Cursor::ascending(&self.window),
        }
    }

    /// Entries from most to least recently used.
    pub fn iter_desc(&self) -> Iter<'_, K, V> {
        Iter {
            core: self,
            cursor: Cursor::descending(&self.window),
        }
    }

    /// Validates column alignment, key distinctness, the capacity bound and
    /// the recency window.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.keys.len() != self.values.len() || self.keys.len() != self.window.len() {
            return Err(InvariantError::new(format!(
                "column lengths differ: keys {}, values {}, ticks {}",
                self.keys.len(),
                self.values.len(),
                self.window.len()
            )));
        }
        if self.keys.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.keys.len(),
                self.capacity
            )));
        }
        for (slot, key) in self.keys.iter().enumerate() {
            if self.keys[slot + 1..].contains(key) {
                return Err(InvariantError::new(format!(
                    "key at slot {} is stored more than once",
                    slot
                )));
            }
        }
        self.window.check_invariants()
    }

    /// Panics if [`check_invariants`](Self::check_invariants) fails.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("LruCore: {}", err);
        }
    }

    /// Shared-access `get` used by the concurrent wrapper's read path.
    ///
    /// Concurrent stamps may leave the window with gaps or duplicates;
    /// [`settle_window`](Self::settle_window) restores it under the write
    /// lock.
    #[cfg(feature = "concurrency")]
    pub(crate) fn get_shared(&self, key: &K) -> Option<&V> {
        let Some(slot) = self.position(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        // A saturated clock skips the stamp; the next exclusive touch rebases.
        self.window.touch_shared(slot);
        Some(&self.values[slot])
    }

    #[cfg(feature = "concurrency")]
    pub(crate) fn settle_window(&mut self) {
        let renumbering = self.window.settle();
        self.note_renumbering(renumbering);
    }

    #[inline]
    fn position(&self, key: &K) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    fn oldest_slot(&self) -> Option<usize> {
        if self.keys.is_empty() {
            return None;
        }
        self.window.find(self.window.oldest()).or_else(|| {
            (0..self.window.len()).min_by_key(|&slot| (self.window.tick(slot), slot))
        })
    }

    /// Pushes a new entry as most recently used, evicting first when full.
    /// Returns the new slot.
    fn append(&mut self, key: K, value: V) -> usize {
        if self.keys.len() >= self.capacity {
            self.evict_oldest();
        }
        self.keys.push(key);
        self.values.push(value);
        let renumbering = self.window.push();
        self.note_renumbering(renumbering);
        self.keys.len() - 1
    }

    fn evict_oldest(&mut self) -> bool {
        let Some((key, value)) = self.remove_oldest() else {
            return false;
        };

        trace!(
            len = self.keys.len(),
            clock = self.window.clock(),
            "evicted least recently used entry"
        );
        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();

        self.notify(key, value);
        true
    }

    /// Detaches the entry holding the oldest tick, repairing the window once
    /// if no slot holds it.
    fn remove_oldest(&mut self) -> Option<(K, V)> {
        if self.keys.is_empty() {
            return None;
        }
        let slot = match self.window.find(self.window.oldest()) {
            Some(slot) => slot,
            None => {
                self.window.repair();
                self.note_renumbering(Renumbering::Repaired);
                self.window.find(self.window.oldest())?
            },
        };
        Some(self.take_slot(slot))
    }

    fn take_slot(&mut self, slot: usize) -> (K, V) {
        self.window.swap_remove(slot);
        (self.keys.swap_remove(slot), self.values.swap_remove(slot))
    }

    #[inline]
    fn notify(&self, key: K, value: V) {
        if let Some(on_evict) = &self.on_evict {
            on_evict(key, value);
        }
    }

    fn clear_columns(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.window.clear();

        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    #[inline]
    fn note_renumbering(&self, renumbering: Renumbering) {
        #[cfg(feature = "metrics")]
        {
            match renumbering {
                Renumbering::Rebased => self.metrics.record_rebase(),
                Renumbering::Repaired => self.metrics.record_repair(),
                Renumbering::None => {},
            }
        }
        #[cfg(not(feature = "metrics"))]
        let _ = renumbering;
    }
}

fn fit_column<T>(column: &mut Vec<T>, capacity: usize) {
    if capacity > column.capacity() {
        column.reserve_exact(capacity - column.len());
    } else {
        column.shrink_to(capacity);
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCore<K, V>
where
    K: Eq,
{
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.metrics.get_calls.get(),
            get_hits: self.metrics.get_hits.get(),
            get_misses: self.metrics.get_misses.get(),
            insert_calls: self.metrics.insert_calls.get(),
            insert_updates: self.metrics.insert_updates.get(),
            insert_new: self.metrics.insert_new.get(),
            evicted_entries: self.metrics.evicted_entries.get(),
            remove_calls: self.metrics.remove_calls.get(),
            remove_found: self.metrics.remove_found.get(),
            pop_lru_found: self.metrics.pop_lru_found.get(),
            producer_calls: self.metrics.producer_calls.get(),
            producer_errors: self.metrics.producer_errors.get(),
            repairs: self.metrics.repairs.get(),
            rebases: self.metrics.rebases.get(),
            resizes: self.metrics.resizes.get(),
            clears: self.metrics.clears.get(),
            cache_len: self.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCore<K, V>
where
    K: Eq,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsReset for LruCore<K, V> {
    fn reset_metrics(&self) {
        self.metrics.reset_metrics();
    }
}

impl<K, V> fmt::Debug for LruCore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.keys.len())
            .field("capacity", &self.capacity)
            .field("clock", &self.window.clock())
            .field("on_evict", &self.on_evict.is_some())
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCore<K, V>
where
    K: Eq,
{
    /// Applies [`replace`](LruCore::replace) to each pair.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.replace(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a LruCore<K, V>
where
    K: Eq,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Iteration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Walk {
    Storage { next: usize },
    Ascending { tick: u64 },
    Descending { tick: u64 },
}

/// Traversal state shared by the borrowing and lock-holding iterators.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    walk: Walk,
    remaining: usize,
}

impl Cursor {
    fn storage(len: usize) -> Self {
        Self {
            walk: Walk::Storage { next: 0 },
            remaining: len,
        }
    }

    fn ascending(window: &RecencyWindow) -> Self {
        Self {
            walk: Walk::Ascending {
                tick: window.oldest(),
            },
            remaining: window.len(),
        }
    }

    fn descending(window: &RecencyWindow) -> Self {
        Self {
            walk: Walk::Descending {
                tick: window.newest().unwrap_or(0),
            },
            remaining: window.len(),
        }
    }

    /// Next slot to yield. A tick with no slot ends the walk.
    fn next_slot(&mut self, window: &RecencyWindow) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let slot = match &mut self.walk {
            Walk::Storage { next } => {
                let slot = *next;
                *next += 1;
                Some(slot)
            },
            Walk::Ascending { tick } => {
                let slot = window.find(*tick);
                *tick = tick.wrapping_add(1);
                slot
            },
            Walk::Descending { tick } => {
                let slot = window.find(*tick);
                *tick = tick.wrapping_sub(1);
                slot
            },
        };
        match slot {
            Some(_) => self.remaining -= 1,
            None => self.remaining = 0,
        }
        slot
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.walk {
            Walk::Storage { .. } => (self.remaining, Some(self.remaining)),
            _ => (0, Some(self.remaining)),
        }
    }
}

/// Borrowing iterator over `(&K, &V)`, see [`LruCore::iter`],
/// [`LruCore::iter_asc`] and [`LruCore::iter_desc`].
pub struct Iter<'a, K, V> {
    core: &'a LruCore<K, V>,
    cursor: Cursor,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let core = self.core;
        let slot = self.cursor.next_slot(&core.window)?;
        Some((&core.keys[slot], &core.values[slot]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.cursor.remaining)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Cache trait implementations
// ---------------------------------------------------------------------------

impl<K, V> RecencyCache<K, V> for LruCore<K, V>
where
    K: Eq,
{
    #[inline]
    fn len(&self) -> usize {
        LruCore::len(self)
    }

    #[inline]
    fn cap(&self) -> usize {
        LruCore::cap(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        LruCore::capacity(self)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        LruCore::contains(self, key)
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        LruCore::get(self, key)
    }

    #[inline]
    fn peek(&self, key: &K) -> Option<&V> {
        LruCore::peek(self, key)
    }

    #[inline]
    fn get_or_set<E, F>(&mut self, key: K, producer: F) -> Result<&V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        LruCore::get_or_set(self, key, producer)
    }

    #[inline]
    fn set(&mut self, key: K, value: V) -> bool {
        LruCore::set(self, key, value)
    }

    #[inline]
    fn replace(&mut self, key: K, value: V) -> bool {
        LruCore::replace(self, key, value)
    }

    #[inline]
    fn remove(&mut self, key: &K) -> bool {
        LruCore::remove(self, key)
    }

    fn remove_all(&mut self) {
        LruCore::remove_all(self);
    }

    fn reset(&mut self) {
        LruCore::reset(self);
    }

    fn resize(&mut self, capacity: usize) -> Result<(), ConfigError> {
        LruCore::resize(self, capacity)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCore<K, V>
where
    K: Eq,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        LruCore::pop_lru(self)
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        LruCore::peek_lru(self)
    }

    fn touch(&mut self, key: &K) -> bool {
        LruCore::touch(self, key)
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        LruCore::recency_rank(self, key)
    }
}

// ---------------------------------------------------------------------------
// Concurrent wrapper
// ---------------------------------------------------------------------------

/// Thread-safe LRU cache: one `RwLock` around an [`LruCore`].
///
/// Cloning the handle shares the same cache.
///
/// | Lock      | Operations                                                  |
/// |-----------|-------------------------------------------------------------|
/// | read      | `len`, `cap`, `capacity`, `contains`, `get`, `get_with`,    |
/// |           | `peek`, `peek_with`, `peek_lru`, `recency_rank`, `iter*`    |
/// | write     | `set`, `replace`, `remove`, `remove_all`, `reset`,          |
/// |           | `resize`, `get_or_set`, `touch`, `pop_lru`                  |
///
/// `get` stamps recency under the read lock; racing readers can leave the
/// recency window inconsistent, and the next write operation repairs it.
///
/// # Deadlocks
///
/// `on_evict` and the `get_or_set` producer run while the write lock is held,
/// and the iterators hold the read lock until dropped. Calling back into the
/// same cache from any of them deadlocks.
///
/// # Example
///
/// ```
/// use std::thread;
/// use tickcache::policy::lru::ConcurrentLruCache;
///
/// let cache = ConcurrentLruCache::new(64);
/// let handles: Vec<_> = (0..4u64)
///     .map(|t| {
///         let cache = cache.clone();
///         thread::spawn(move || {
///             for i in 0..16 {
///                 cache.set(t * 100 + i, i);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(cache.len(), 64);
/// ```
#[cfg(feature = "concurrency")]
pub struct ConcurrentLruCache<K, V> {
    inner: Arc<RwLock<LruCore<K, V>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> Clone for ConcurrentLruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> From<LruCore<K, V>> for ConcurrentLruCache<K, V> {
    fn from(core: LruCore<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(core)),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Send + Sync,
    V: Send + Sync,
{
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        LruCore::new(capacity).into()
    }

    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        LruCore::try_new(capacity).map(Self::from)
    }

    /// The callback runs under the write lock.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_on_evict<F>(capacity: usize, on_evict: F) -> Self
    where
        F: Fn(K, V) + Send + Sync + 'static,
    {
        LruCore::with_on_evict(capacity, on_evict).into()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn cap(&self) -> usize {
        self.inner.read().cap()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    /// Cloned value for `key`, marking it most recently used.
    ///
    /// Runs under the **read lock**. For values that are expensive or
    /// impossible to clone, use [`get_with`](Self::get_with).
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get_shared(key).cloned()
    }

    /// Applies `f` to the value under the read lock, marking it most recently
    /// used.
    ///
    /// ```
    /// use tickcache::policy::lru::ConcurrentLruCache;
    ///
    /// let cache = ConcurrentLruCache::new(4);
    /// cache.set("blob", vec![0u8; 1024]);
    /// assert_eq!(cache.get_with(&"blob", |v| v.len()), Some(1024));
    /// ```
    pub fn get_with<F, R>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        self.inner.read().get_shared(key).map(f)
    }

    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().peek(key).cloned()
    }

    pub fn peek_with<F, R>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        self.inner.read().peek(key).map(f)
    }

    pub fn peek_lru(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .read()
            .peek_lru()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        self.inner.read().recency_rank(key)
    }

    /// Returns the cached value, or runs `producer` and caches its result.
    ///
    /// The write lock is held for the whole call, producer included, so at
    /// most one producer runs at a time across all keys and every other
    /// operation waits for it. A panicking producer releases the lock and
    /// leaves the cache unchanged.
    ///
    /// ```
    /// use tickcache::policy::lru::ConcurrentLruCache;
    ///
    /// let cache = ConcurrentLruCache::new(8);
    /// let v = cache.get_or_set("answer", |_| Ok::<_, ()>(42));
    /// assert_eq!(v, Ok(42));
    /// // cached now; the producer is not consulted
    /// let v = cache.get_or_set("answer", |_| Err(()));
    /// assert_eq!(v, Ok(42));
    /// ```
    pub fn get_or_set<E, F>(&self, key: K, producer: F) -> Result<V, E>
    where
        V: Clone,
        F: FnOnce(&K) -> Result<V, E>,
    {
        self.write().get_or_set(key, producer).cloned()
    }

    pub fn set(&self, key: K, value: V) -> bool {
        self.write().set(key, value)
    }

    pub fn replace(&self, key: K, value: V) -> bool {
        self.write().replace(key, value)
    }

    pub fn remove(&self, key: &K) -> bool {
        self.write().remove(key)
    }

    pub fn remove_all(&self) {
        self.write().remove_all();
    }

    pub fn reset(&self) {
        self.write().reset();
    }

    pub fn resize(&self, capacity: usize) -> Result<(), ConfigError> {
        self.write().resize(capacity)
    }

    pub fn touch(&self, key: &K) -> bool {
        self.write().touch(key)
    }

    pub fn pop_lru(&self) -> Option<(K, V)> {
        self.write().pop_lru()
    }

    /// Cloned entries in storage order. Holds the read lock until dropped.
    pub fn iter(&self) -> ReadIter<'_, K, V> {
        let guard = self.inner.read();
        let cursor = Cursor::storage(guard.len());
        ReadIter { guard, cursor }
    }

    /// Cloned entries from least to most recently used. Holds the read lock
    /// until dropped.
    ///
    /// Concurrent [`get`](Self::get) calls stamp recency under the same read
    /// lock, so a walk that overlaps them can come out reordered, repeat an
    /// entry, skip one, or end early. Use [`iter`](Self::iter) when every
    /// entry must be seen exactly once.
    pub fn iter_asc(&self) -> ReadIter<'_, K, V> {
        let guard = self.inner.read();
        let cursor = Cursor::ascending(&guard.window);
        ReadIter { guard, cursor }
    }

    /// Cloned entries from most to least recently used. Holds the read lock
    /// until dropped. Overlapping [`get`](Self::get) calls weaken the order
    /// the same way as for [`iter_asc`](Self::iter_asc).
    pub fn iter_desc(&self) -> ReadIter<'_, K, V> {
        let guard = self.inner.read();
        let cursor = Cursor::descending(&guard.window);
        ReadIter { guard, cursor }
    }

    /// See [`LruCore::check_invariants`]. Racing readers can leave the
    /// recency window broken until the next write operation.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.read().check_invariants()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }

    /// Write guard with the recency window repaired after racing readers.
    fn write(&self) -> RwLockWriteGuard<'_, LruCore<K, V>> {
        let mut cache = self.inner.write();
        cache.settle_window();
        cache
    }
}

#[cfg(all(feature = "concurrency", feature = "metrics"))]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for ConcurrentLruCache<K, V>
where
    K: Eq + Send + Sync,
    V: Send + Sync,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentCache for ConcurrentLruCache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("ConcurrentLruCache")
            .field("len", &inner.keys.len())
            .field("capacity", &inner.capacity)
            .finish_non_exhaustive()
    }
}

/// Iterator over cloned `(K, V)` pairs that keeps the cache's read lock until
/// dropped.
#[cfg(feature = "concurrency")]
pub struct ReadIter<'a, K, V> {
    guard: RwLockReadGuard<'a, LruCore<K, V>>,
    cursor: Cursor,
}

#[cfg(feature = "concurrency")]
impl<K, V> Iterator for ReadIter<'_, K, V>
where
    K: Clone,
    V: Clone,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor.next_slot(&self.guard.window)?;
        Some((self.guard.keys[slot].clone(), self.guard.values[slot].clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

#[cfg(feature = "concurrency")]
impl<K: Clone, V: Clone> FusedIterator for ReadIter<'_, K, V> {}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ReadIter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadIter")
            .field("remaining", &self.cursor.remaining)
            .finish()
    }
}

//! # Least Recently Used (LRU) Memoizing Cache
//!
//! Stores the results of a deterministic computation keyed by its input. A
//! lookup either returns the stored value (a hit) or runs the caller's
//! computation, stores the result and returns it (a miss). Once more than
//! `capacity` entries are resident the least recently used one is evicted.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         LruCache<K, V>                               │
//!   │                                                                      │
//!   │   ┌──────────────────────────────┐                                   │
//!   │   │  FxHashMap<K, SlotId>        │                                   │
//!   │   │                              │                                   │
//!   │   │   "a" ──► id_2               │                                   │
//!   │   │   "b" ──► id_0               │                                   │
//!   │   │   "c" ──► id_1               │                                   │
//!   │   └──────────────┬───────────────┘                                   │
//!   │                  │ O(1) lookup                                       │
//!   │                  ▼                                                   │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  IntrusiveList<Entry<K, V>>  (nodes in a SlotArena)          │   │
//!   │   │                                                              │   │
//!   │   │  head (MRU)                                      tail (LRU)  │   │
//!   │   │   [id_1: c] ◄──► [id_2: a] ◄──► [id_0: b]                    │   │
//!   │   │                                     ▲                        │   │
//!   │   │                                     └── next eviction        │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                                                      │
//!   │   hits: u64     misses: u64     capacity: usize                      │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation            | Hit                         | Miss                              |
//! |----------------------|-----------------------------|-----------------------------------|
//! | `get_or_compute`     | move to head, `hits += 1`   | compute, push head, evict tail    |
//! | `try_get_or_compute` | same as above               | on `Err`, nothing changes         |
//! | `peek`               | no reordering, no counters  | `None`                            |
//! | `stats`              | read-only                   | read-only                         |
//!
//! All of them are O(1) except `iter`, `recency_rank` and `check_invariants`,
//! which walk the list.
//!
//! ## Failed Computations
//!
//! The miss counter is bumped only after the computation returns a value. A
//! computation that fails leaves the map, the recency list and both counters
//! exactly as they were, and its error is returned to the caller untouched.
//!
//! ## Thread Safety
//!
//! - `LruCache`: **NOT thread-safe**; every mutating call takes `&mut self`.
//! - `ConcurrentLruCache`: thread-safe via `parking_lot::RwLock` (feature
//!   `concurrency`). Lookups hold the write lock while the computation runs,
//!   so a slow computation blocks every other caller of the same cache.
//!
//! ## Example Usage
//!
//! ```
//! use memokit::policy::lru::LruCache;
//!
//! let mut cache = LruCache::new(2).unwrap();
//!
//! assert_eq!(*cache.get_or_compute("a", || 1), 1); // miss
//! assert_eq!(*cache.get_or_compute("b", || 2), 2); // miss
//! assert_eq!(*cache.get_or_compute("a", || 0), 1); // hit, "a" is now MRU
//! cache.get_or_compute("c", || 3);                 // miss, evicts "b"
//!
//! assert!(!cache.contains("b"));
//! let stats = cache.stats();
//! assert_eq!((stats.hits, stats.misses, stats.current_size), (1, 3, 2));
//! ```

use std::borrow::Borrow;
use std::convert::Infallible;
use std::fmt;
use std::hash::Hash;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::builder::DEFAULT_CAPACITY;
use crate::ds::{IntrusiveList, SlotId};
use crate::error::{ConfigError, InvariantError};
use crate::stats::CacheStats;
use crate::traits::StatsProvider;

/// Upper bound on up-front allocation; larger caches grow on demand.
const MAX_PREALLOC: usize = 1 << 16;

/// Resident entry. The key is kept next to the value so eviction can clear
/// the map without a reverse lookup.
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Bounded memoizing cache with least-recently-used eviction.
///
/// Keys are cloned once per miss (one copy for the map, one in the list
/// node). Values are stored inline and handed out by reference.
pub struct LruCache<K, V> {
    map: FxHashMap<K, SlotId>,
    list: IntrusiveList<Entry<K, V>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use memokit::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::new(100).unwrap();
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(LruCache::<u32, String>::new(0).is_err());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity { capacity });
        }
        Ok(Self::with_valid_capacity(capacity))
    }

    fn with_valid_capacity(capacity: usize) -> Self {
        debug!(capacity, "creating lru cache");
        let reserve = capacity.min(MAX_PREALLOC);
        Self {
            map: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            list: IntrusiveList::with_capacity(reserve),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the value cached for `key`, running `compute` on a miss.
    ///
    /// On a hit `compute` is not called and `key` becomes the most recently
    /// used entry. On a miss the computed value is inserted as the most
    /// recently used entry and, if the cache is then over capacity, the least
    /// recently used entry is evicted.
    ///
    /// # Example
    ///
    /// ```
    /// use memokit::policy::lru::LruCache;
    ///
    /// let mut cache = LruCache::new(8).unwrap();
    /// let mut calls = 0;
    /// for _ in 0..3 {
    ///     cache.get_or_compute(7u64, || {
    ///         calls += 1;
    ///         7 * 7
    ///     });
    /// }
    /// assert_eq!(calls, 1);
    /// assert_eq!(cache.stats().hits, 2);
    /// ```
    pub fn get_or_compute<F>(&mut self, key: K, compute: F) -> &V
    where
        F: FnOnce() -> V,
    {
        match self.lookup_or_compute(key, |_| Ok::<V, Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible form of [`get_or_compute`](Self::get_or_compute).
    ///
    /// If `compute` returns `Err`, the error is returned unchanged and the
    /// cache is left exactly as it was: no entry, no reordering, no counter
    /// change.
    ///
    /// # Example
    ///
    /// ```
    /// use memokit::policy::lru::LruCache;
    ///
    /// let mut cache: LruCache<&str, u32> = LruCache::new(4).unwrap();
    /// let parsed: Result<&u32, std::num::ParseIntError> =
    ///     cache.try_get_or_compute("x", || "nope".parse());
    /// assert!(parsed.is_err());
    /// assert_eq!(cache.stats().misses, 0);
    /// assert!(cache.is_empty());
    ///
    /// assert_eq!(cache.try_get_or_compute("y", || "12".parse::<u32>()), Ok(&12));
    /// ```
    pub fn try_get_or_compute<E, F>(&mut self, key: K, compute: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        self.lookup_or_compute(key, |_| compute())
    }

    /// Shared lookup path; `compute` sees the key it is computing for.
    pub(crate) fn lookup_or_compute<E, F>(&mut self, key: K, compute: F) -> Result<&V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        if let Some(&id) = self.map.get(&key) {
            self.hits += 1;
            self.list.move_to_front(id);
            return Ok(&self.list[id].value);
        }

        let value = compute(&key)?;
        self.misses += 1;

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.map.insert(key, id);
        if self.list.len() > self.capacity {
            self.evict_lru();
        }

        debug_assert_eq!(self.map.len(), self.list.len());
        debug_assert!(self.list.len() <= self.capacity);

        Ok(&self.list[id].value)
    }

    fn evict_lru(&mut self) {
        if let Some(evicted) = self.list.pop_back() {
            self.map.remove(&evicted.key);
            trace!(
                len = self.list.len(),
                capacity = self.capacity,
                "evicted least recently used entry"
            );
        }
    }

    /// Returns the cached value without touching recency or counters.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.get(key).map(|&id| &self.list[id].value)
    }

    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// The entry the next over-capacity miss would evict.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Position of `key` counted from the most recently used end (0 = MRU).
    ///
    /// Walks the list, O(n).
    pub fn recency_rank<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let &target = self.map.get(key)?;
        self.list.iter_ids().position(|id| id == target)
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Hits, misses, capacity and current size.
    #[inline]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.capacity,
            current_size: self.list.len(),
        }
    }

    /// Checks that the map and the recency list describe the same entries.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_invariants()?;

        if self.map.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "map len {} != list len {}",
                self.map.len(),
                self.list.len()
            )));
        }
        if self.list.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        for id in self.list.iter_ids() {
            if self.map.get(&self.list[id].key) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "list slot {} not indexed by its key",
                    id.index()
                )));
            }
        }
        Ok(())
    }
}

impl<K, V> StatsProvider for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn stats(&self) -> CacheStats {
        LruCache::stats(self)
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with [`DEFAULT_CAPACITY`] entries.
    fn default() -> Self {
        Self::with_valid_capacity(DEFAULT_CAPACITY)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.list.len())
            .field("capacity", &self.capacity)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish_non_exhaustive()
    }
}

/// Thread-safe LRU memoizing cache.
///
/// Every lookup takes the write lock for its whole duration, computation
/// included, so at most one mutation is in flight. Values are stored as
/// `Arc<V>` and returned as cheap clones. Cloning the handle shares the
/// underlying cache.
#[cfg(feature = "concurrency")]
pub struct ConcurrentLruCache<K, V> {
    inner: Arc<RwLock<LruCache<K, Arc<V>>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Creates a new thread-safe cache with the given capacity.
    ///
    /// # Example
    ///
    /// ```
    /// use memokit::policy::lru::ConcurrentLruCache;
    ///
    /// let cache: ConcurrentLruCache<u32, String> = ConcurrentLruCache::new(100).unwrap();
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Arc::new(RwLock::new(LruCache::new(capacity)?)),
        })
    }

    /// Returns the value cached for `key`, running `compute` on a miss.
    ///
    /// # Example
    ///
    /// ```
    /// use memokit::policy::lru::ConcurrentLruCache;
    /// use std::sync::Arc;
    ///
    /// let cache = ConcurrentLruCache::new(16).unwrap();
    /// let first = cache.get_or_compute(1u64, || "one".to_string());
    /// let second = cache.get_or_compute(1u64, || unreachable!());
    /// assert!(Arc::ptr_eq(&first, &second));
    /// ```
    pub fn get_or_compute<F>(&self, key: K, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        let mut cache = self.inner.write();
        Arc::clone(cache.get_or_compute(key, || Arc::new(compute())))
    }

    /// Fallible lookup; a failed computation leaves the cache untouched.
    pub fn try_get_or_compute<E, F>(&self, key: K, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let mut cache = self.inner.write();
        cache
            .try_get_or_compute(key, || compute().map(Arc::new))
            .map(Arc::clone)
    }

    /// Reads a value without affecting recency. Only takes the read lock.
    pub fn peek<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let cache = self.inner.read();
        cache.peek(key).map(Arc::clone)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.read().check_invariants()
    }
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
impl<K, V> StatsProvider for ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
    fn stats(&self) -> CacheStats {
        ConcurrentLruCache::stats(self)
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("ConcurrentLruCache")
            .field("len", &cache.list.len())
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}

//! Builder for the caches in this crate.
//!
//! Holds the one tunable (capacity) and hands out a single-threaded cache,
//! a shared thread-safe cache or a memoized function from the same settings.
//!
//! ## Example
//!
//! ```rust
//! use memokit::builder::MemoBuilder;
//!
//! let builder = MemoBuilder::new(64);
//! let mut cache = builder.build::<u64, String>().unwrap();
//! assert_eq!(cache.get_or_compute(1, || "hello".to_string()), "hello");
//!
//! let mut double = builder.memoize(|x: &u64| x * 2).unwrap();
//! assert_eq!(*double.call(21), 42);
//! ```

use std::hash::Hash;

use crate::error::ConfigError;
use crate::memoize::Memoized;
#[cfg(feature = "concurrency")]
use crate::policy::lru::ConcurrentLruCache;
use crate::policy::lru::LruCache;

/// Capacity used when none is given.
pub const DEFAULT_CAPACITY: usize = 128;

/// Cache configuration. Validation happens when a cache is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoBuilder {
    capacity: usize,
}

impl MemoBuilder {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Replaces the configured capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn configured_capacity(&self) -> usize {
        self.capacity
    }

    /// Builds a single-threaded [`LruCache`].
    pub fn build<K, V>(&self) -> Result<LruCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        LruCache::new(self.capacity)
    }

    /// Builds a shared, lock-serialized [`ConcurrentLruCache`].
    #[cfg(feature = "concurrency")]
    pub fn build_concurrent<K, V>(&self) -> Result<ConcurrentLruCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone + Send + Sync,
        V: Send + Sync,
    {
        ConcurrentLruCache::new(self.capacity)
    }

    /// Wraps `func` in a [`Memoized`] with this capacity.
    pub fn memoize<A, V, F>(&self, func: F) -> Result<Memoized<A, V, F>, ConfigError>
    where
        A: Eq + Hash + Clone,
    {
        Memoized::with_capacity(func, self.capacity)
    }
}

impl Default for MemoBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

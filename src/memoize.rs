//! Function memoization on top of [`LruCache`].
//!
//! [`Memoized`] owns a function and a cache. Calling it with an argument
//! value returns the cached result for that value, running the function only
//! on a miss. Multi-argument functions take a tuple: the whole tuple is the
//! cache key, so `(1, 2)` and `(1, 3)` are distinct entries.
//!
//! ## Example
//!
//! ```
//! use memokit::memoize::Memoized;
//!
//! let mut calls = 0;
//! let mut add = Memoized::new(|&(a, b): &(u32, u32)| {
//!     calls += 1;
//!     a + b
//! });
//!
//! assert_eq!(*add.call((1, 2)), 3);
//! assert_eq!(*add.call((1, 3)), 4);
//! assert_eq!(*add.call((1, 2)), 3);
//!
//! let info = add.cache_info();
//! assert_eq!((info.hits, info.misses, info.capacity, info.current_size), (1, 2, 128, 2));
//! drop(add);
//! assert_eq!(calls, 2);
//! ```

use std::fmt;
use std::hash::Hash;

use crate::builder::DEFAULT_CAPACITY;
use crate::error::ConfigError;
use crate::policy::lru::LruCache;
use crate::stats::CacheStats;
use crate::traits::StatsProvider;

/// A function wrapped with an LRU result cache.
///
/// `A` is the argument (key) type, `V` the cached result type. The function
/// receives the argument by reference; the cache then takes ownership of it
/// as the key, so no clone happens on the miss path beyond the one
/// [`LruCache`] makes for its index.
pub struct Memoized<A, V, F> {
    func: F,
    cache: LruCache<A, V>,
}

/// Wraps `func` in a cache of `capacity` entries.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidCapacity`] if `capacity` is zero.
pub fn memoize<A, V, F>(func: F, capacity: usize) -> Result<Memoized<A, V, F>, ConfigError>
where
    A: Eq + Hash + Clone,
{
    Memoized::with_capacity(func, capacity)
}

impl<A, V, F> Memoized<A, V, F>
where
    A: Eq + Hash + Clone,
{
    /// Wraps `func` with a cache of [`DEFAULT_CAPACITY`] entries.
    pub fn new(func: F) -> Self {
        Self {
            func,
            cache: LruCache::default(),
        }
    }

    /// Wraps `func` with a cache of `capacity` entries.
    pub fn with_capacity(func: F, capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            func,
            cache: LruCache::new(capacity)?,
        })
    }

    /// Returns `func(&args)`, computed at most once while `args` stays resident.
    pub fn call(&mut self, args: A) -> &V
    where
        F: FnMut(&A) -> V,
    {
        let func = &mut self.func;
        match self
            .cache
            .lookup_or_compute(args, |args| Ok::<V, std::convert::Infallible>(func(args)))
        {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Calls a fallible function. Errors are returned as-is and nothing is
    /// cached for that argument.
    ///
    /// # Example
    ///
    /// ```
    /// use memokit::memoize::memoize;
    ///
    /// let mut parse = memoize(|s: &String| s.parse::<i64>(), 16).unwrap();
    /// assert_eq!(parse.try_call("42".to_string()), Ok(&42));
    /// assert!(parse.try_call("x".to_string()).is_err());
    /// assert_eq!(parse.cache_info().current_size, 1);
    /// ```
    pub fn try_call<E>(&mut self, args: A) -> Result<&V, E>
    where
        F: FnMut(&A) -> Result<V, E>,
    {
        let func = &mut self.func;
        self.cache.lookup_or_compute(args, |args| func(args))
    }

    /// Hits, misses, capacity and current size of the underlying cache.
    pub fn cache_info(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Read-only access to the underlying cache.
    pub fn cache(&self) -> &LruCache<A, V> {
        &self.cache
    }
}

impl<A, V, F> StatsProvider for Memoized<A, V, F>
where
    A: Eq + Hash + Clone,
{
    fn stats(&self) -> CacheStats {
        self.cache_info()
    }
}

impl<A, V, F> fmt::Debug for Memoized<A, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

//! Shared interface for anything that reports [`CacheStats`].
//!
//! `LruCache` mutates through `&mut self` and hands out `&V`, while
//! `ConcurrentLruCache` mutates through `&self` and hands out `Arc<V>`, so
//! the lookup itself is not abstracted. Statistics are, which lets tests and
//! callers inspect any of the caches the same way.

use crate::stats::CacheStats;

/// Provides a [`CacheStats`] snapshot.
///
/// # Example
///
/// ```
/// use memokit::policy::lru::LruCache;
/// use memokit::traits::StatsProvider;
///
/// fn hit_rate(cache: &impl StatsProvider) -> f64 {
///     cache.stats().hit_rate()
/// }
///
/// let mut cache = LruCache::new(4).unwrap();
/// cache.get_or_compute(1, || "one");
/// cache.get_or_compute(1, || "one");
/// assert_eq!(hit_rate(&cache), 0.5);
/// ```
pub trait StatsProvider {
    fn stats(&self) -> CacheStats;
}

//! Hit/miss accounting reported by every cache in this crate.

/// Point-in-time view of a cache's counters and size.
///
/// `hits` and `misses` are cumulative over the cache's lifetime and never
/// decrease. `current_size` is always `<= capacity`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub current_size: usize,
}

impl CacheStats {
    /// Completed lookups, hit or miss.
    #[inline]
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups served from the cache; `0.0` before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

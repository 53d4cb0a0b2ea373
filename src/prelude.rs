pub use crate::builder::{DEFAULT_CAPACITY, MemoBuilder};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::memoize::{Memoized, memoize};
#[cfg(feature = "concurrency")]
pub use crate::policy::lru::ConcurrentLruCache;
pub use crate::policy::lru::LruCache;
pub use crate::stats::CacheStats;
pub use crate::traits::StatsProvider;

//! memokit: a bounded memoizing cache with least-recently-used eviction.
//!
//! [`LruCache`](policy::lru::LruCache) stores the results of a deterministic
//! computation keyed by input and evicts the least recently used entry once
//! its capacity is exceeded. Lookup, insertion, eviction and recency updates
//! are all O(1).

pub mod builder;
pub mod ds;
pub mod error;
pub mod memoize;
pub mod policy;
pub mod prelude;
pub mod stats;
pub mod traits;

//! Error types for memokit.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: returned when a cache is constructed with invalid
//!   parameters (zero capacity).
//! - [`InvariantError`]: returned by `check_invariants` when the map and the
//!   recency list disagree.
//!
//! A failing computation is not represented here. `try_get_or_compute` and
//! `Memoized::try_call` hand the caller's own error back unchanged.
//!
//! ## Example Usage
//!
//! ```
//! use memokit::error::ConfigError;
//! use memokit::policy::lru::LruCache;
//!
//! let err = LruCache::<u64, u64>::new(0).unwrap_err();
//! assert_eq!(err, ConfigError::InvalidCapacity { capacity: 0 });
//! assert!(err.to_string().contains("capacity"));
//! ```

use thiserror::Error;

/// Error returned when cache configuration parameters are invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("capacity must be > 0, got {capacity}")]
    InvalidCapacity { capacity: usize },
}

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

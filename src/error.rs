//! Error types for the evictkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (e.g. capacity below the minimum, zero reporting interval). No engine is
//!   created when validation fails.
//! - [`InvariantError`]: Returned by `check_invariants` methods when internal
//!   data-structure invariants are violated.
//!
//! A missing key is never an error: lookups return `None` and removals of
//! absent keys are no-ops.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::error::ConfigError;
//! use evictkit::policy::lru::LruCache;
//!
//! let cache: Result<LruCache<String, i32>, ConfigError> = LruCache::new(100);
//! assert!(cache.is_ok());
//!
//! let bad = LruCache::<String, i32>::new(1);
//! assert_eq!(bad.unwrap_err(), ConfigError::CapacityTooSmall { capacity: 1, min: 2 });
//! ```

use thiserror::Error;

/// Smallest capacity accepted by either engine.
///
/// The LFU eviction path needs room for at least one resident entry besides
/// the one just inserted.
pub const MIN_CAPACITY: usize = 2;

/// Error returned when cache configuration parameters are invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("capacity must be at least {min}, got {capacity}")]
    CapacityTooSmall { capacity: usize, min: usize },

    #[error("stats reporting interval must be non-zero")]
    ZeroStatsInterval,
}

impl ConfigError {
    /// Validates a capacity against [`MIN_CAPACITY`].
    pub(crate) fn check_capacity(capacity: usize) -> Result<(), ConfigError> {
        if capacity < MIN_CAPACITY {
            tracing::warn!(capacity, min = MIN_CAPACITY, "rejecting cache capacity");
            return Err(ConfigError::CapacityTooSmall {
                capacity,
                min: MIN_CAPACITY,
            });
        }
        Ok(())
    }
}

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`LruCache::check_invariants`](crate::policy::lru::LruCache::check_invariants)
/// and [`LfuCache::check_invariants`](crate::policy::lfu::LfuCache::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Engine configuration.
//!
//! [`CacheConfig`] carries the scalar knobs shared by both engines. Hooks are
//! supplied separately through [`CacheHooks`](crate::hooks::CacheHooks) or
//! collected by [`CacheBuilder`](crate::builder::CacheBuilder).
//!
//! ```
//! use evictkit::config::CacheConfig;
//! use std::time::Duration;
//!
//! let config = CacheConfig::new(128).with_max_age(Duration::from_secs(30));
//! assert!(config.validate().is_ok());
//!
//! // Zero disables TTL.
//! let config = CacheConfig::new(128).with_max_age(Duration::ZERO);
//! assert_eq!(config.ttl(), None);
//! ```

use std::time::Duration;

use crate::error::ConfigError;

/// Upper bound on up-front reservation so huge capacities don't allocate eagerly.
const PREALLOC_LIMIT: usize = 1 << 16;

/// Configuration for engine construction.
///
/// | Field      | Default | Description                                       |
/// |------------|---------|---------------------------------------------------|
/// | `capacity` | 1000    | Maximum resident entries, at least 2              |
/// | `max_age`  | `None`  | Passive TTL; `None` or zero disables expiry       |
/// | `prealloc` | `true`  | Reserve index/list storage for `capacity` entries |
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheConfig {
    pub capacity: usize,
    pub max_age: Option<Duration>,
    pub prealloc: bool,
}

impl CacheConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn with_prealloc(mut self, prealloc: bool) -> Self {
        self.prealloc = prealloc;
        self
    }

    /// Checks every field; engines are only built from a validated config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_capacity(self.capacity)
    }

    /// Effective TTL: `None` when disabled.
    pub fn ttl(&self) -> Option<Duration> {
        self.max_age.filter(|age| !age.is_zero())
    }

    pub(crate) fn reserve_hint(&self) -> usize {
        if self.prealloc {
            self.capacity.min(PREALLOC_LIMIT)
        } else {
            0
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            max_age: None,
            prealloc: true,
        }
    }
}

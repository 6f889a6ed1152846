//! Unified cache builder for both eviction policies.
//!
//! Collects capacity, TTL and hooks once, then produces a concrete engine, a
//! policy-dispatching [`Cache`], or one of the locking wrappers.
//!
//! ## Example
//!
//! ```rust
//! use evictkit::builder::{CacheBuilder, CachePolicy};
//! use evictkit::traits::CacheEngine;
//! use std::time::Duration;
//!
//! let mut cache = CacheBuilder::<u64, String>::new(100)
//!     .max_age(Duration::from_secs(60))
//!     .on_evict(|key, _value| println!("evicted {key}"))
//!     .build(CachePolicy::Lfu)
//!     .unwrap();
//! cache.set(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use crate::config::CacheConfig;
use crate::error::ConfigError;
use crate::hooks::CacheHooks;
use crate::metrics::CacheStats;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::traits::CacheEngine;

#[cfg(feature = "concurrency")]
use crate::concurrent::{AutoLockCache, SharedCache};
#[cfg(feature = "concurrency")]
use crate::reporter::StatsReporter;

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    Lru,
    /// Least Frequently Used eviction (bucket-based, LRU tie-break).
    Lfu,
}

/// Engine chosen at runtime, with the same API regardless of policy.
pub enum Cache<K, V> {
    Lru(LruCache<K, V>),
    Lfu(LfuCache<K, V>),
}

impl<K, V> Cache<K, V> {
    pub fn policy(&self) -> CachePolicy {
        match self {
            Cache::Lru(_) => CachePolicy::Lru,
            Cache::Lfu(_) => CachePolicy::Lfu,
        }
    }
}

impl<K, V> CacheEngine for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    type Key = K;
    type Value = V;

    fn set(&mut self, key: K, value: V) {
        match self {
            Cache::Lru(lru) => lru.set(key, value),
            Cache::Lfu(lfu) => lfu.set(key, value),
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        match self {
            Cache::Lru(lru) => lru.get(key),
            Cache::Lfu(lfu) => lfu.get(key),
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        match self {
            Cache::Lru(lru) => lru.remove(key),
            Cache::Lfu(lfu) => lfu.remove(key),
        }
    }

    fn clear(&mut self) {
        match self {
            Cache::Lru(lru) => lru.clear(),
            Cache::Lfu(lfu) => lfu.clear(),
        }
    }

    fn stats(&mut self) -> CacheStats {
        match self {
            Cache::Lru(lru) => lru.stats(),
            Cache::Lfu(lfu) => lfu.stats(),
        }
    }

    fn totals(&self) -> CacheStats {
        match self {
            Cache::Lru(lru) => lru.totals(),
            Cache::Lfu(lfu) => lfu.totals(),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match self {
            Cache::Lru(lru) => lru.contains(key),
            Cache::Lfu(lfu) => lfu.contains(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            Cache::Lru(lru) => lru.len(),
            Cache::Lfu(lfu) => lfu.len(),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            Cache::Lru(lru) => lru.capacity(),
            Cache::Lfu(lfu) => lfu.capacity(),
        }
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cache::Lru(lru) => fmt::Debug::fmt(lru, f),
            Cache::Lfu(lfu) => fmt::Debug::fmt(lfu, f),
        }
    }
}

/// Builder for cache instances.
pub struct CacheBuilder<K, V> {
    config: CacheConfig,
    hooks: CacheHooks<K, V>,
}

impl<K, V> CacheBuilder<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Starts a builder for a cache of `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self::from_config(CacheConfig::new(capacity))
    }

    pub fn from_config(config: CacheConfig) -> Self {
        Self {
            config,
            hooks: CacheHooks::new(),
        }
    }

    /// Entries expire this long after their last `set`; hits do not refresh
    /// the timestamp. Zero disables expiry.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.config.max_age = Some(max_age);
        self
    }

    pub fn prealloc(mut self, prealloc: bool) -> Self {
        self.config.prealloc = prealloc;
        self
    }

    pub fn on_hit(mut self, f: impl FnMut(&K, &V) + Send + 'static) -> Self {
        self.hooks = self.hooks.on_hit(f);
        self
    }

    pub fn on_miss(mut self, f: impl FnMut(&K) + Send + 'static) -> Self {
        self.hooks = self.hooks.on_miss(f);
        self
    }

    pub fn on_evict(mut self, f: impl FnMut(&K, &V) + Send + 'static) -> Self {
        self.hooks = self.hooks.on_evict(f);
        self
    }

    pub fn on_fill_level(mut self, f: impl FnMut(u8) + Send + 'static) -> Self {
        self.hooks = self.hooks.on_fill_level(f);
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn build_lru(self) -> Result<LruCache<K, V>, ConfigError> {
        LruCache::with_hooks(self.config, self.hooks)
    }

    pub fn build_lfu(self) -> Result<LfuCache<K, V>, ConfigError> {
        LfuCache::with_hooks(self.config, self.hooks)
    }

    /// Builds the engine for `policy` behind the policy-dispatching [`Cache`].
    pub fn build(self, policy: CachePolicy) -> Result<Cache<K, V>, ConfigError> {
        match policy {
            CachePolicy::Lru => self.build_lru().map(Cache::Lru),
            CachePolicy::Lfu => self.build_lfu().map(Cache::Lfu),
        }
    }

    /// Builds an engine that locks once per operation.
    #[cfg(feature = "concurrency")]
    pub fn build_auto_lock(
        self,
        policy: CachePolicy,
    ) -> Result<AutoLockCache<Cache<K, V>>, ConfigError> {
        self.build(policy).map(AutoLockCache::new)
    }

    /// Builds a cloneable shared engine with guard-based batching.
    #[cfg(feature = "concurrency")]
    pub fn build_shared(self, policy: CachePolicy) -> Result<SharedCache<Cache<K, V>>, ConfigError> {
        self.build(policy).map(SharedCache::new)
    }

    /// Builds a shared engine and starts a [`StatsReporter`] that hands `f` a
    /// delta snapshot every `interval`.
    ///
    /// The reporter stops when the returned handle is stopped or dropped.
    /// Fails with [`ConfigError::ZeroStatsInterval`] when `interval` is zero.
    #[cfg(feature = "concurrency")]
    pub fn build_reported<F>(
        self,
        policy: CachePolicy,
        interval: Duration,
        f: F,
    ) -> Result<(SharedCache<Cache<K, V>>, StatsReporter), ConfigError>
    where
        K: Send + 'static,
        V: Send + 'static,
        F: FnMut(CacheStats) + Send + 'static,
    {
        if interval.is_zero() {
            tracing::warn!("rejecting zero stats interval");
            return Err(ConfigError::ZeroStatsInterval);
        }
        let cache = self.build_shared(policy)?;
        let reporter = StatsReporter::spawn(cache.clone(), interval, f)?;
        Ok((cache, reporter))
    }
}

impl<K, V> fmt::Debug for CacheBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .finish()
    }
}

//! # LRU (Least Recently Used) Cache Engine
//!
//! Fixed-capacity cache that evicts the entry touched longest ago. One
//! [`IntrusiveList`] holds every entry in recency order; an `FxHashMap`
//! maps each key to its node handle.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LruCache<K, V>                              │
//!   │                                                                      │
//!   │   index: FxHashMap<K, SlotId>                                        │
//!   │   ┌─────────┬────────┐                                               │
//!   │   │  "a"    │  id_2  │──────────────┐                                │
//!   │   │  "b"    │  id_0  │──────┐       │                                │
//!   │   │  "c"    │  id_1  │──┐   │       │                                │
//!   │   └─────────┴────────┘  │   │       │                                │
//!   │                         ▼   ▼       ▼                                │
//!   │   list:  head ─► [c] ◄──► [b] ◄──► [a] ◄── tail                      │
//!   │                  MRU                LRU (evicted first)              │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Method      | Complexity | Effect                                          |
//! |-------------|------------|-------------------------------------------------|
//! | `set`       | O(1)       | Insert/replace at MRU; evict LRU when over full |
//! | `get`       | O(1)       | Move to MRU on hit; lazily expire on TTL        |
//! | `remove`    | O(1)       | Detach node                                     |
//! | `clear`     | O(n)       | Drop all nodes, zero statistics                 |
//! | `stats`     | O(1)       | Delta read, resets event counters               |
//!
//! ## Example
//!
//! ```
//! use evictkit::policy::lru::LruCache;
//! use evictkit::traits::CacheEngine;
//!
//! let mut cache = LruCache::new(2).unwrap();
//! cache.set("a", 1);
//! cache.set("b", 2);
//! assert_eq!(cache.get(&"a"), Some(&1)); // "a" is now most recent
//!
//! cache.set("c", 3); // evicts "b"
//! assert!(!cache.contains(&"b"));
//!
//! let stats = cache.stats();
//! assert_eq!(stats.evictions, 1);
//! assert_eq!(stats.hits, 1);
//! ```
//!
//! ## Thread Safety
//!
//! `LruCache` has no internal synchronization. Wrap it in
//! [`AutoLockCache`](crate::concurrent::AutoLockCache) or
//! [`SharedCache`](crate::concurrent::SharedCache), or hold it behind a lock
//! of your own.

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::ds::{IntrusiveList, SlotId};
use crate::error::{ConfigError, InvariantError};
use crate::hooks::CacheHooks;
use crate::metrics::{CacheStats, StatsCounters};
use crate::policy::Entry;
use crate::traits::CacheEngine;

/// Recency-ordered, fixed-capacity cache.
pub struct LruCache<K, V> {
    list: IntrusiveList<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
    capacity: usize,
    max_age: Option<Duration>,
    stats: StatsCounters,
    hooks: CacheHooks<K, V>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries, without TTL or hooks.
    ///
    /// Fails with [`ConfigError::CapacityTooSmall`] when `capacity < 2`.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Self::with_hooks(CacheConfig::new(capacity), CacheHooks::new())
    }

    /// Creates a cache whose entries expire `max_age` after their last `set`.
    /// Hits do not extend an entry's lifetime. A zero `max_age` disables expiry.
    pub fn with_max_age(capacity: usize, max_age: Duration) -> Result<Self, ConfigError> {
        Self::with_hooks(
            CacheConfig::new(capacity).with_max_age(max_age),
            CacheHooks::new(),
        )
    }

    /// Creates a cache from a full configuration and a set of hooks.
    pub fn with_hooks(config: CacheConfig, hooks: CacheHooks<K, V>) -> Result<Self, ConfigError> {
        config.validate()?;
        let reserve = config.reserve_hint();
        debug!(
            target: "evictkit::lru",
            capacity = config.capacity,
            ttl = ?config.ttl(),
            "creating lru cache"
        );
        Ok(Self {
            list: IntrusiveList::with_capacity(reserve),
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            capacity: config.capacity,
            max_age: config.ttl(),
            stats: StatsCounters::new(),
            hooks,
        })
    }

    /// Configured TTL, if expiry is enabled.
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Reads a value without touching recency, statistics, hooks or TTL.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|entry| &entry.key)
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            trace!(
                target: "evictkit::lru",
                len = self.list.len(),
                capacity = self.capacity,
                "evicted least recently used entry"
            );
            self.hooks.evict(&entry.key, &entry.value);
        }
    }

    /// Verifies that the index and the recency list describe the same entries.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index has {} keys but list has {} nodes",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.list.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        let mut walked = 0usize;
        for id in self.list.iter_ids() {
            walked += 1;
            let entry = self
                .list
                .get(id)
                .ok_or_else(|| InvariantError::new("list yielded a dead handle"))?;
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new("index handle does not match list node"));
            }
            if self.max_age.is_some() != entry.touched.is_some() {
                return Err(InvariantError::new("timestamp presence disagrees with TTL"));
            }
        }
        if walked != self.list.len() {
            return Err(InvariantError::new("list walk length differs from len"));
        }
        Ok(())
    }
}

impl<K, V> CacheEngine for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    type Key = K;
    type Value = V;

    fn set(&mut self, key: K, value: V) {
        self.stats.record_set();

        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(id) {
                entry.update(value, self.max_age);
            }
            self.list.move_to_front(id);
            return;
        }

        let id = self
            .list
            .push_front(Entry::new(key.clone(), value, self.max_age));
        self.index.insert(key, id);

        if self.list.len() > self.capacity {
            self.evict_lru();
        } else {
            self.hooks.fill_level(self.list.len(), self.capacity);
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.stats.record_get();

        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            self.hooks.miss(key);
            return None;
        };

        let expired = self
            .list
            .get(id)
            .map_or(false, |entry| entry.is_expired(self.max_age));
        if expired {
            self.index.remove(key);
            if let Some(entry) = self.list.remove(id) {
                self.stats.record_eviction();
                trace!(target: "evictkit::lru", len = self.list.len(), "expired entry on read");
                self.hooks.evict(&entry.key, &entry.value);
            }
            return None;
        }

        self.list.move_to_front(id);
        self.stats.record_hit();
        let entry = self.list.get(id)?;
        self.hooks.hit(&entry.key, &entry.value);
        Some(&entry.value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        let entry = self.list.remove(id)?;
        self.hooks.fill_level(self.list.len(), self.capacity);
        Some(entry.value)
    }

    fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
        self.stats.reset();
        self.hooks.fill_level(0, self.capacity);
    }

    fn stats(&mut self) -> CacheStats {
        self.stats.take_delta(self.list.len(), self.capacity)
    }

    fn totals(&self) -> CacheStats {
        self.stats.totals(self.list.len(), self.capacity)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.list.len())
            .field("capacity", &self.capacity)
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

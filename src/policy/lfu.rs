//! # LFU (Least Frequently Used) Cache Engine
//!
//! Fixed-capacity cache that evicts the entry with the fewest reads, breaking
//! ties by recency within a frequency tier.
//!
//! ## Architecture
//!
//! Two levels of [`IntrusiveList`]: an outer list of frequency buckets ordered
//! from highest count (front) to lowest (back), and inside each bucket a list
//! of entries ordered from most to least recently touched.
//!
//! ```text
//!   index: FxHashMap<K, EntryHandle { bucket, node }>
//!
//!   buckets (outer list, highest count first)
//!
//!   head ─► ┌──────────────┐ ◄──► ┌──────────────┐ ◄──► ┌──────────────┐ ◄── tail
//!           │ count = 7    │      │ count = 3    │      │ count = 1    │
//!           │ [a]          │      │ [d] ◄──► [b] │      │ [e] ◄──► [c] │
//!           └──────────────┘      └──────────────┘      └──────────────┘
//!                                                              evict ──► c
//! ```
//!
//! ## Promotion on `get`
//!
//! ```text
//!   split:      [3: d b] [1: e]   get(b) ──► [4: b] [3: d] [1: e]
//!   in place:   [4: b] [3: d]     get(d) ──► [4: b] [4→ d]         (alone, no 4-tier)
//!   recombine:  [4: b] [3: d]     get(d) ──► [4: d b]              (neighbour has 4)
//! ```
//!
//! A bucket is never left empty: the operation that empties it unlinks it
//! from the outer list. Buckets are ordered by construction, no operation
//! re-sorts them.
//!
//! ## Operations
//!
//! | Method      | Complexity | Effect                                           |
//! |-------------|------------|--------------------------------------------------|
//! | `set`       | O(1)       | Insert at count 1 or refresh in place            |
//! | `get`       | O(1)       | Promote to the next tier, or pin on overflow     |
//! | `remove`    | O(1)       | Detach entry, prune emptied bucket               |
//! | `frequency` | O(1)       | Read count without promoting                     |
//! | `clear`     | O(n)       | Drop all buckets, zero statistics                |
//!
//! ## Example
//!
//! ```
//! use evictkit::policy::lfu::LfuCache;
//! use evictkit::traits::CacheEngine;
//!
//! let mut cache = LfuCache::new(2).unwrap();
//! cache.set("hot", 1);
//! cache.set("cold", 2);
//! for _ in 0..10 {
//!     cache.get(&"hot");
//! }
//! cache.get(&"cold");
//!
//! cache.set("new", 3); // "cold" has the lower count
//! assert!(cache.contains(&"hot"));
//! assert!(!cache.contains(&"cold"));
//! assert_eq!(cache.frequency(&"hot"), Some(11));
//! ```

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

/// Emptied entry lists kept for reuse by new buckets.
const SPARE_LISTS: usize = 8;

/// One frequency tier.
#[derive(Debug)]
struct Bucket<K, V> {
    count: u64,
    entries: IntrusiveList<Entry<K, V>>,
}

/// Location of an entry: its bucket in the outer list and its node inside
/// that bucket's entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EntryHandle {
    bucket: SlotId,
    node: SlotId,
}

/// Frequency-ordered, fixed-capacity cache.
pub struct LfuCache<K, V> {
    buckets: IntrusiveList<Bucket<K, V>>,
    index: FxHashMap<K, EntryHandle>,
    spare: Vec<IntrusiveList<Entry<K, V>>>,
    len: usize,
    capacity: usize,
    max_age: Option<Duration>,
    stats: StatsCounters,
    hooks: CacheHooks<K, V>,
}

impl<K, V> LfuCache<K, V>
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
            target: "evictkit::lfu",
            capacity = config.capacity,
            ttl = ?config.ttl(),
            "creating lfu cache"
        );
        Ok(Self {
            buckets: IntrusiveList::new(),
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            spare: Vec::new(),
            len: 0,
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

    /// Reads a value without promoting it or touching statistics, hooks or TTL.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entry(*self.index.get(key)?).map(|entry| &entry.value)
    }

    /// Current access count of `key`. New entries start at 1.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let handle = self.index.get(key)?;
        self.buckets.get(handle.bucket).map(|bucket| bucket.count)
    }

    /// Number of distinct frequency tiers.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// `(count, entries)` for every tier, highest count first.
    pub fn tiers(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.buckets
            .iter()
            .map(|bucket| (bucket.count, bucket.entries.len()))
    }

    fn entry(&self, handle: EntryHandle) -> Option<&Entry<K, V>> {
        self.buckets.get(handle.bucket)?.entries.get(handle.node)
    }

    fn new_bucket(&mut self, count: u64) -> Bucket<K, V> {
        Bucket {
            count,
            entries: self.spare.pop().unwrap_or_default(),
        }
    }

    /// Unlinks `bucket` if its entry list is empty.
    fn prune(&mut self, bucket: SlotId) {
        let empty = self
            .buckets
            .get(bucket)
            .map_or(false, |b| b.entries.is_empty());
        if !empty {
            return;
        }
        if let Some(mut removed) = self.buckets.remove(bucket) {
            if self.spare.len() < SPARE_LISTS {
                removed.entries.clear();
                self.spare.push(removed.entries);
            }
        }
    }

    /// Detaches the entry at `handle`, pruning its bucket if emptied.
    fn detach(&mut self, handle: EntryHandle) -> Option<Entry<K, V>> {
        let entry = self
            .buckets
            .get_mut(handle.bucket)?
            .entries
            .remove(handle.node)?;
        self.len -= 1;
        self.prune(handle.bucket);
        Some(entry)
    }

    /// Picks the bucket to evict from after `populated` received a new entry.
    ///
    /// Normally that is `populated` itself. When it holds nothing but the new
    /// entry, the next tier toward the front is used instead, falling back to
    /// `populated` when it is the only bucket.
    fn victim_bucket(&self, populated: SlotId) -> SlotId {
        let singleton = self
            .buckets
            .get(populated)
            .map_or(false, |b| b.entries.len() == 1);
        if singleton {
            self.buckets.prev_id(populated).unwrap_or(populated)
        } else {
            populated
        }
    }

    fn evict_from(&mut self, bucket: SlotId) {
        let Some(node) = self.buckets.get(bucket).and_then(|b| b.entries.back_id()) else {
            return;
        };
        let Some(entry) = self.detach(EntryHandle { bucket, node }) else {
            return;
        };
        self.index.remove(&entry.key);
        self.stats.record_eviction();
        trace!(
            target: "evictkit::lfu",
            len = self.len,
            capacity = self.capacity,
            buckets = self.buckets.len(),
            "evicted least frequently used entry"
        );
        self.hooks.evict(&entry.key, &entry.value);
    }

    /// Moves the entry at `handle` one tier up and returns its new location.
    fn promote(&mut self, handle: EntryHandle) -> EntryHandle {
        let Some(bucket) = self.buckets.get_mut(handle.bucket) else {
            return handle;
        };
        let Some(next) = bucket.count.checked_add(1) else {
            bucket.entries.move_to_front(handle.node);
            debug!(
                target: "evictkit::lfu",
                count = bucket.count,
                "access count saturated; pinning entry at top tier"
            );
            return handle;
        };
        let alone = bucket.entries.len() == 1;

        let prev = self.buckets.prev_id(handle.bucket);
        let prev_matches = prev
            .and_then(|id| self.buckets.get(id))
            .map_or(false, |b| b.count == next);

        if alone && !prev_matches {
            if let Some(bucket) = self.buckets.get_mut(handle.bucket) {
                bucket.count = next;
            }
            return handle;
        }

        let target = match prev {
            Some(id) if prev_matches => id,
            _ => {
                let fresh = self.new_bucket(next);
                match self.buckets.insert_before(handle.bucket, fresh) {
                    Some(id) => id,
                    None => return handle,
                }
            }
        };

        let Some(entry) = self
            .buckets
            .get_mut(handle.bucket)
            .and_then(|b| b.entries.remove(handle.node))
        else {
            return handle;
        };
        let Some(node) = self
            .buckets
            .get_mut(target)
            .map(|b| b.entries.push_front(entry))
        else {
            return handle;
        };
        self.prune(handle.bucket);
        EntryHandle {
            bucket: target,
            node,
        }
    }

    /// Verifies tier ordering, bucket occupancy, and index consistency.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.len {
            return Err(InvariantError::new(format!(
                "index has {} keys but len is {}",
                self.index.len(),
                self.len
            )));
        }
        if self.len > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.len, self.capacity
            )));
        }

        let mut previous: Option<u64> = None;
        let mut total = 0usize;
        for bucket_id in self.buckets.iter_ids() {
            let bucket = self
                .buckets
                .get(bucket_id)
                .ok_or_else(|| InvariantError::new("outer list yielded a dead handle"))?;
            if bucket.count == 0 {
                return Err(InvariantError::new("bucket with zero count"));
            }
            if bucket.entries.is_empty() {
                return Err(InvariantError::new(format!(
                    "empty bucket with count {}",
                    bucket.count
                )));
            }
            if let Some(prev) = previous {
                if bucket.count >= prev {
                    return Err(InvariantError::new(format!(
                        "bucket count {} follows {}; tiers must strictly decrease",
                        bucket.count, prev
                    )));
                }
            }
            previous = Some(bucket.count);

            for node in bucket.entries.iter_ids() {
                let entry = bucket
                    .entries
                    .get(node)
                    .ok_or_else(|| InvariantError::new("bucket yielded a dead handle"))?;
                let expected = EntryHandle {
                    bucket: bucket_id,
                    node,
                };
                if self.index.get(&entry.key) != Some(&expected) {
                    return Err(InvariantError::new("index handle does not match entry"));
                }
                if self.max_age.is_some() != entry.touched.is_some() {
                    return Err(InvariantError::new("timestamp presence disagrees with TTL"));
                }
                total += 1;
            }
        }
        if total != self.len {
            return Err(InvariantError::new(format!(
                "buckets hold {} entries but len is {}",
                total, self.len
            )));
        }
        Ok(())
    }
}

impl<K, V> CacheEngine for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    type Key = K;
    type Value = V;

    fn set(&mut self, key: K, value: V) {
        self.stats.record_set();

        if let Some(&handle) = self.index.get(&key) {
            if let Some(bucket) = self.buckets.get_mut(handle.bucket) {
                if let Some(entry) = bucket.entries.get_mut(handle.node) {
                    entry.update(value, self.max_age);
                }
                bucket.entries.move_to_front(handle.node);
            }
            return;
        }

        let base = match self.buckets.back_id() {
            Some(id) if self.buckets.back().map_or(false, |b| b.count == 1) => id,
            _ => {
                let fresh = self.new_bucket(1);
                self.buckets.push_back(fresh)
            }
        };
        let entry = Entry::new(key.clone(), value, self.max_age);
        let Some(node) = self
            .buckets
            .get_mut(base)
            .map(|b| b.entries.push_front(entry))
        else {
            return;
        };
        self.index.insert(key, EntryHandle { bucket: base, node });
        self.len += 1;

        if self.len > self.capacity {
            let victim = self.victim_bucket(base);
            self.evict_from(victim);
        } else {
            self.hooks.fill_level(self.len, self.capacity);
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.stats.record_get();

        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            self.hooks.miss(key);
            return None;
        };

        let expired = self
            .entry(handle)
            .map_or(false, |entry| entry.is_expired(self.max_age));
        if expired {
            self.index.remove(key);
            if let Some(entry) = self.detach(handle) {
                self.stats.record_eviction();
                trace!(target: "evictkit::lfu", len = self.len, "expired entry on read");
                self.hooks.evict(&entry.key, &entry.value);
            }
            return None;
        }

        let moved = self.promote(handle);
        if moved != handle {
            if let Some(slot) = self.index.get_mut(key) {
                *slot = moved;
            }
        }
        self.stats.record_hit();
        let entry = self.buckets.get(moved.bucket)?.entries.get(moved.node)?;
        self.hooks.hit(&entry.key, &entry.value);
        Some(&entry.value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let handle = self.index.remove(key)?;
        let entry = self.detach(handle)?;
        self.hooks.fill_level(self.len, self.capacity);
        Some(entry.value)
    }

    fn clear(&mut self) {
        while let Some(mut bucket) = self.buckets.pop_front() {
            if self.spare.len() < SPARE_LISTS {
                bucket.entries.clear();
                self.spare.push(bucket.entries);
            }
        }
        self.index.clear();
        self.len = 0;
        self.stats.reset();
        self.hooks.fill_level(0, self.capacity);
    }

    fn stats(&mut self) -> CacheStats {
        self.stats.take_delta(self.len, self.capacity)
    }

    fn totals(&self) -> CacheStats {
        self.stats.totals(self.len, self.capacity)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("buckets", &self.buckets.len())
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn hour_cache(capacity: usize) -> LfuCache<&'static str, i32> {
        LfuCache::with_max_age(capacity, Duration::from_secs(3600)).unwrap()
    }

    fn tiers<K: Eq + Hash + Clone, V>(cache: &LfuCache<K, V>) -> Vec<(u64, usize)> {
        cache.tiers().collect()
    }

    fn front_values<K: Eq + Hash + Clone, V: Copy>(cache: &LfuCache<K, V>) -> Vec<V> {
        cache
            .buckets
            .front()
            .map(|b| b.entries.iter().map(|e| e.value).collect())
            .unwrap_or_default()
    }

    // ==============================================
    // Basic Behavior
    // ==============================================

    mod basic_behavior {
        use super::*;

        #[test]
        fn test_capacity_below_two_is_rejected() {
            assert!(LfuCache::<u8, u8>::new(1).is_err());
            assert!(LfuCache::<u8, u8>::new(0).is_err());
        }

        #[test]
        fn test_basics() {
            let mut c = hour_cache(3);
            c.set("1", 1);
            c.set("2", 2);
            c.set("3", 3);
            c.set("1", 1);
            c.set("4", 4);

            assert_eq!(c.totals().evictions, 1);
            assert_eq!(c.capacity(), 3);
            assert_eq!(c.len(), 3);
            assert_eq!(c.get(&"1"), Some(&1));
            assert_eq!(c.get(&"2"), None);
            assert_eq!(c.get(&"3"), Some(&3));
            assert_eq!(c.get(&"4"), Some(&4));

            c.remove(&"3");
            assert_eq!(c.get(&"3"), None);

            c.clear();
            assert_eq!(c.capacity(), 3);
            assert_eq!(c.len(), 0);
            assert_eq!(c.bucket_count(), 0);
            c.check_invariants().unwrap();
        }

        #[test]
        fn test_set_existing_keeps_frequency() {
            let mut c = hour_cache(3);
            c.set("a", 1);
            c.get(&"a");
            c.set("a", 2);
            assert_eq!(c.frequency(&"a"), Some(2));
            assert_eq!(c.peek(&"a"), Some(&2));
            assert_eq!(c.len(), 1);
        }

        #[test]
        fn test_frequency_does_not_promote() {
            let mut c = hour_cache(3);
            c.set("a", 1);
            assert_eq!(c.frequency(&"a"), Some(1));
            assert_eq!(c.frequency(&"a"), Some(1));
            assert_eq!(c.frequency(&"zz"), None);
            assert_eq!(c.totals().gets, 0);
        }

        #[test]
        fn test_remove_prunes_bucket() {
            let mut c = hour_cache(3);
            c.set("a", 1);
            c.set("b", 2);
            c.get(&"a");
            assert_eq!(tiers(&c), vec![(2, 1), (1, 1)]);
            assert_eq!(c.remove(&"a"), Some(1));
            assert_eq!(tiers(&c), vec![(1, 1)]);
            assert_eq!(c.remove(&"a"), None);
            c.check_invariants().unwrap();
        }
    }

    // ==============================================
    // Bucket Splitting and Recombining
    // ==============================================

    mod bucket_structure {
        use super::*;

        #[test]
        fn test_split_and_recombine() {
            let mut c = hour_cache(2);
            c.set("1", 1);
            c.set("2", 2);

            assert_eq!(c.get(&"1"), Some(&1));
            assert_eq!(c.get(&"1"), Some(&1));
            assert_eq!(c.get(&"2"), Some(&2));
            assert_eq!(c.bucket_count(), 2);

            c.set("3", 3);

            assert_eq!(c.get(&"1"), Some(&1));
            assert_eq!(c.get(&"2"), None);
            assert_eq!(c.get(&"3"), Some(&3));

            c.clear();
            assert_eq!(c.capacity(), 2);
            assert_eq!(c.len(), 0);
        }

        #[test]
        fn test_tier_transitions() {
            let mut c = hour_cache(2);
            c.set("1", 1);
            c.set("2", 2);
            assert_eq!(tiers(&c), vec![(1, 2)]);

            // split
            assert_eq!(c.get(&"1"), Some(&1));
            assert_eq!(tiers(&c), vec![(2, 1), (1, 1)]);

            // alone at the front: in place
            assert_eq!(c.get(&"1"), Some(&1));
            assert_eq!(tiers(&c), vec![(3, 1), (1, 1)]);

            // alone, neighbour is not the next tier: in place
            assert_eq!(c.get(&"2"), Some(&2));
            assert_eq!(tiers(&c), vec![(3, 1), (2, 1)]);

            // recombine into the neighbour
            assert_eq!(c.get(&"2"), Some(&2));
            assert_eq!(tiers(&c), vec![(3, 2)]);
            assert_eq!(front_values(&c), vec![2, 1]);
            c.check_invariants().unwrap();

            assert_eq!(c.get(&"1"), Some(&1));
            assert_eq!(c.bucket_count(), 2);
            assert_eq!(c.get(&"1"), Some(&1));
            assert_eq!(c.bucket_count(), 2);
            assert_eq!(c.get(&"2"), Some(&2));
            assert_eq!(c.bucket_count(), 2);
            assert_eq!(c.get(&"2"), Some(&2));
            assert_eq!(c.bucket_count(), 1);

            c.set("3", 3);
            assert_eq!(c.get(&"1"), None);
            assert_eq!(c.get(&"2"), Some(&2));
            assert_eq!(c.get(&"3"), Some(&3));
            c.check_invariants().unwrap();
        }

        #[test]
        fn test_overflow_pins_at_top_tier() {
            let mut c = hour_cache(2);
            c.set("1", 1);
            assert_eq!(c.bucket_count(), 1);

            let front = c.buckets.front_id().unwrap();
            c.buckets.get_mut(front).unwrap().count = u64::MAX;

            assert_eq!(c.get(&"1"), Some(&1));
            assert_eq!(c.bucket_count(), 1);
            assert_eq!(c.frequency(&"1"), Some(u64::MAX));
            c.check_invariants().unwrap();
        }

        #[test]
        fn test_overflow_moves_to_front_of_tier() {
            let mut c = hour_cache(3);
            c.set("a", 1);
            c.set("b", 2);
            let front = c.buckets.front_id().unwrap();
            c.buckets.get_mut(front).unwrap().count = u64::MAX;
            assert_eq!(front_values(&c), vec![2, 1]);

            c.get(&"a");
            assert_eq!(front_values(&c), vec![1, 2]);
            assert_eq!(tiers(&c), vec![(u64::MAX, 2)]);
        }
    }

    // ==============================================
    // Eviction
    // ==============================================

    mod eviction {
        use super::*;

        #[test]
        fn test_frequency_beats_recency() {
            let mut c = hour_cache(2);
            c.set("1", 1);
            c.set("2", 2);
            for _ in 0..1_000 {
                c.get(&"1");
            }
            for _ in 0..100 {
                c.get(&"2");
            }

            c.set("3", 3);
            assert_eq!(c.get(&"1"), Some(&1));
            assert_eq!(c.get(&"2"), None);
            assert_eq!(c.get(&"3"), Some(&3));
        }

        #[test]
        fn test_cleared_cache_evicts_oldest_new_entry() {
            let mut c = hour_cache(3);
            c.set("x", 0);
            c.get(&"x");
            c.clear();

            c.set("a", 1);
            c.set("b", 2);
            c.set("c", 3);
            assert_eq!(tiers(&c), vec![(1, 3)]);
            c.set("d", 4);

            assert!(!c.contains(&"a"));
            assert!(c.contains(&"d"));
            assert_eq!(tiers(&c), vec![(1, 3)]);
            c.check_invariants().unwrap();
        }

        #[test]
        fn test_singleton_new_bucket_evicts_next_tier() {
            let mut c = hour_cache(2);
            c.set("a", 1);
            c.set("b", 2);
            c.get(&"a");
            c.get(&"b");
            // both at count 2, "a" least recently touched
            assert_eq!(tiers(&c), vec![(2, 2)]);

            c.set("c", 3);
            assert!(!c.contains(&"a"));
            assert!(c.contains(&"b"));
            assert!(c.contains(&"c"));
            assert_eq!(tiers(&c), vec![(2, 1), (1, 1)]);
        }

        #[test]
        fn test_victim_without_neighbour_is_current_bucket() {
            let mut c = hour_cache(2);
            c.set("a", 1);
            let only = c.buckets.front_id().unwrap();
            assert_eq!(c.victim_bucket(only), only);
        }

        #[test]
        fn test_len_never_exceeds_capacity() {
            let mut c: LfuCache<u32, u32> = LfuCache::new(4).unwrap();
            for i in 0..200 {
                c.set(i % 17, i);
                c.get(&(i % 5));
                assert!(c.len() <= 4);
            }
            c.check_invariants().unwrap();
        }
    }

    // ==============================================
    // TTL, Stats, Hooks
    // ==============================================

    mod ttl_and_stats {
        use super::*;

        #[test]
        fn test_max_age_expiry_is_eviction() {
            let mut c = LfuCache::with_max_age(3, Duration::from_nanos(1)).unwrap();
            c.set("1", 1);
            assert_eq!(c.len(), 1);
            std::thread::sleep(Duration::from_millis(5));
            assert_eq!(c.get(&"1"), None);
            assert_eq!(c.len(), 0);
            assert_eq!(c.bucket_count(), 0);

            let stats = c.stats();
            assert_eq!(stats.evictions, 1);
            assert_eq!(stats.misses, 0);
            c.check_invariants().unwrap();
        }

        #[test]
        fn test_hits_do_not_extend_lifetime() {
            let mut c = LfuCache::with_max_age(2, Duration::from_millis(600)).unwrap();
            c.set(1, 1);
            std::thread::sleep(Duration::from_millis(300));
            assert_eq!(c.get(&1), Some(&1));
            assert_eq!(c.frequency(&1), Some(2));
            std::thread::sleep(Duration::from_millis(400));
            assert_eq!(c.get(&1), None);
            assert_eq!(c.bucket_count(), 0);

            let stats = c.stats();
            assert_eq!((stats.hits, stats.evictions), (1, 1));
            c.check_invariants().unwrap();
        }

        #[test]
        fn test_stats_delta() {
            let mut c = LfuCache::new(2).unwrap();
            c.set("a", 1);
            c.get(&"a");
            c.get(&"b");

            let s = c.stats();
            assert_eq!((s.hits, s.misses, s.gets, s.sets, s.evictions), (1, 1, 2, 1, 0));
            assert_eq!((s.capacity, s.len), (2, 1));
            assert!(c.stats().is_quiet());
            assert_eq!(c.totals().gets, 2);
        }

        #[test]
        fn test_hooks_receive_evicted_entry() {
            let evicted = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&evicted);
            let hooks = CacheHooks::new().on_evict(move |k: &&str, v: &i32| {
                sink.lock().unwrap().push((*k, *v));
            });
            let mut c = LfuCache::with_hooks(CacheConfig::new(2), hooks).unwrap();
            c.set("a", 1);
            c.set("b", 2);
            c.get(&"b");
            c.set("c", 3);
            assert_eq!(*evicted.lock().unwrap(), vec![("a", 1)]);
        }

        #[test]
        fn test_fill_level_reports() {
            let levels = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&levels);
            let hooks = CacheHooks::new().on_fill_level(move |p| sink.lock().unwrap().push(p));
            let mut c = LfuCache::with_hooks(CacheConfig::new(2), hooks).unwrap();
            c.set(1u8, ());
            c.set(2, ());
            c.set(3, ());
            c.remove(&3);
            c.clear();
            assert_eq!(*levels.lock().unwrap(), vec![50, 100, 50, 0]);
        }
    }

    // ==============================================
    // Property Tests
    // ==============================================

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: tier ordering, occupancy and index consistency hold
            /// after every operation.
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_invariants_always_hold(
                capacity in 2usize..10,
                ops in prop::collection::vec((0u8..5, 0u16..24), 0..400)
            ) {
                let mut cache: LfuCache<u16, u16> = LfuCache::new(capacity).unwrap();
                for (op, key) in ops {
                    match op {
                        0 | 1 => cache.set(key, key),
                        2 | 3 => { cache.get(&key); }
                        _ => { cache.remove(&key); }
                    }
                    prop_assert!(cache.len() <= capacity);
                    prop_assert!(cache.check_invariants().is_ok());
                }
            }

            /// Property: frequency equals one plus the number of hits since insert.
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_frequency_counts_hits(hits in 0u64..60) {
                let mut cache: LfuCache<u8, u8> = LfuCache::new(4).unwrap();
                cache.set(1, 1);
                cache.set(2, 2);
                for _ in 0..hits {
                    cache.get(&1);
                }
                prop_assert_eq!(cache.frequency(&1), Some(hits + 1));
                prop_assert_eq!(cache.frequency(&2), Some(1));
            }
        }
    }
}

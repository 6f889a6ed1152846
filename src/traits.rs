//! # Engine Traits
//!
//! [`CacheEngine`] is the unsynchronized operation set shared by
//! [`LruCache`](crate::policy::lru::LruCache) and
//! [`LfuCache`](crate::policy::lfu::LfuCache). The locking wrappers in
//! [`concurrent`](crate::concurrent) are generic over it, so either engine can
//! be wrapped without changes to the engine itself.
//!
//! ```text
//!                 ┌──────────────────────────────────────┐
//!                 │            CacheEngine               │
//!                 │                                      │
//!                 │  type Key; type Value;               │
//!                 │  set(&mut, Key, Value)               │
//!                 │  get(&mut, &Key) → Option<&Value>    │
//!                 │  remove(&mut, &Key) → Option<Value>  │
//!                 │  clear(&mut)                         │
//!                 │  stats(&mut) → CacheStats   (delta)  │
//!                 │  totals(&) → CacheStats (cumulative) │
//!                 │  len / capacity / contains           │
//!                 └──────────────────┬───────────────────┘
//!                                    │
//!               ┌────────────────────┴────────────────────┐
//!               ▼                                         ▼
//!        LruCache<K, V>                            LfuCache<K, V>
//! ```
//!
//! [`StatsSource`] is the narrow interface consumed by the periodic
//! [`StatsReporter`](crate::reporter::StatsReporter): anything that can hand
//! out a delta snapshot from a shared reference.

use crate::metrics::CacheStats;

/// Operations every cache engine supports.
///
/// Engines are not synchronized. `get` takes `&mut self` because a hit
/// reorders internal structures.
pub trait CacheEngine {
    type Key;
    type Value;

    /// Inserts or replaces `key`. May evict exactly one other entry.
    fn set(&mut self, key: Self::Key, value: Self::Value);

    /// Looks up `key`, recording a hit, a miss, or a TTL expiry.
    fn get(&mut self, key: &Self::Key) -> Option<&Self::Value>;

    /// Removes `key` and returns its value; absent keys are a no-op.
    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;

    /// Removes every entry and zeroes the statistics.
    fn clear(&mut self);

    /// Returns event counts since the previous call and starts a new window.
    fn stats(&mut self) -> CacheStats;

    /// Returns event counts since construction or the last `clear`.
    fn totals(&self) -> CacheStats;

    /// Returns `true` if `key` is resident. Does not count as an access and
    /// does not check TTL.
    fn contains(&self, key: &Self::Key) -> bool;

    /// Number of resident entries, including ones past their TTL that have
    /// not been looked up yet.
    fn len(&self) -> usize;

    /// Maximum number of resident entries.
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Source of delta statistics that can be read through a shared reference.
///
/// Implementations take whatever lock they need, copy the counters, and
/// release the lock before returning.
pub trait StatsSource {
    fn take_stats(&self) -> CacheStats;
}

impl<S: StatsSource + ?Sized> StatsSource for std::sync::Arc<S> {
    fn take_stats(&self) -> CacheStats {
        (**self).take_stats()
    }
}

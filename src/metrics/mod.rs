//! Hit/miss/eviction accounting shared by both engines.
//!
//! [`StatsCounters`] is embedded in each engine and updated inline on every
//! operation. [`CacheStats`] is the copy handed to callers, either as a delta
//! (`stats()`) or as cumulative totals (`totals()`).

pub mod counters;
pub mod snapshot;

pub use counters::StatsCounters;
pub use snapshot::CacheStats;

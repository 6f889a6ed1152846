//! Eviction engines.
//!
//! | Engine     | File     | Evicts                                     |
//! |------------|----------|--------------------------------------------|
//! | `LruCache` | `lru.rs` | Least recently touched entry               |
//! | `LfuCache` | `lfu.rs` | Least frequently read entry (LRU tie-break) |
//!
//! Both engines store [`Entry`] values in arena-backed intrusive lists and
//! find them through an `FxHashMap` index.

use std::time::{Duration, Instant};

pub mod lfu;
pub mod lru;

/// Resident key/value pair plus its last-touched time when TTL is enabled.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) touched: Option<Instant>,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V, max_age: Option<Duration>) -> Self {
        Self {
            key,
            value,
            touched: stamp(max_age),
        }
    }

    /// Replaces the value and refreshes the timestamp.
    pub(crate) fn update(&mut self, value: V, max_age: Option<Duration>) {
        self.value = value;
        self.touched = stamp(max_age);
    }

    pub(crate) fn is_expired(&self, max_age: Option<Duration>) -> bool {
        match (max_age, self.touched) {
            (Some(max_age), Some(touched)) => touched.elapsed() > max_age,
            _ => false,
        }
    }
}

#[inline]
fn stamp(max_age: Option<Duration>) -> Option<Instant> {
    max_age.map(|_| Instant::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_without_ttl_never_expires() {
        let entry = Entry::new(1u32, "a", None);
        assert!(entry.touched.is_none());
        assert!(!entry.is_expired(None));
    }

    #[test]
    fn entry_expires_after_max_age() {
        let max_age = Some(Duration::from_nanos(1));
        let entry = Entry::new(1u32, "a", max_age);
        std::thread::sleep(Duration::from_millis(2));
        assert!(entry.is_expired(max_age));
    }

    #[test]
    fn update_refreshes_timestamp() {
        let max_age = Some(Duration::from_secs(3600));
        let mut entry = Entry::new(1u32, "a", max_age);
        let first = entry.touched;
        std::thread::sleep(Duration::from_millis(1));
        entry.update("b", max_age);
        assert_eq!(entry.value, "b");
        assert!(entry.touched > first);
        assert!(!entry.is_expired(max_age));
    }
}

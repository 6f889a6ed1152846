//! Thread-safe wrappers around the engines.
//!
//! | Wrapper            | Locking                         | Multi-op batches      |
//! |--------------------|---------------------------------|-----------------------|
//! | engine itself      | none, caller owns `&mut`        | caller's own lock     |
//! | [`AutoLockCache`]  | one `parking_lot::Mutex` per op | no                    |
//! | [`SharedCache`]    | `Arc<Mutex>`, cloneable handle  | [`SharedCache::lock`] |
//!
//! Every wrapper is generic over [`CacheEngine`], so the same engine type can
//! sit behind any of them. Engines carry no synchronization of their own.
//!
//! ## Hooks and the lock
//!
//! Hooks run inside the engine call, which runs with the wrapper's lock held.
//! A hook that calls back into the same wrapper deadlocks: `parking_lot`
//! mutexes are not reentrant.
//!
//! ## Example
//!
//! ```
//! use evictkit::concurrent::SharedCache;
//! use evictkit::policy::lru::LruCache;
//! use evictkit::traits::CacheEngine;
//!
//! let cache = SharedCache::new(LruCache::new(16).unwrap());
//! let writer = cache.clone();
//! std::thread::spawn(move || writer.set(1u32, "one".to_string()))
//!     .join()
//!     .unwrap();
//!
//! {
//!     let mut guard = cache.lock();
//!     guard.set(2, "two".to_string());
//!     assert_eq!(guard.get(&1).cloned(), Some("one".to_string()));
//! } // released
//!
//! assert_eq!(cache.len(), 2);
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::metrics::CacheStats;
use crate::traits::{CacheEngine, StatsSource};

/// Engine behind a mutex taken once per operation.
///
/// Each call is atomic on its own; a sequence of calls is not. Values come
/// back cloned so no reference outlives the lock.
pub struct AutoLockCache<C> {
    inner: Mutex<C>,
}

impl<C: CacheEngine> AutoLockCache<C> {
    pub fn new(engine: C) -> Self {
        Self {
            inner: Mutex::new(engine),
        }
    }

    pub fn set(&self, key: C::Key, value: C::Value) {
        self.inner.lock().set(key, value);
    }

    pub fn get(&self, key: &C::Key) -> Option<C::Value>
    where
        C::Value: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    pub fn remove(&self, key: &C::Key) -> Option<C::Value> {
        self.inner.lock().remove(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Delta statistics; see [`CacheEngine::stats`].
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn totals(&self) -> CacheStats {
        self.inner.lock().totals()
    }

    pub fn contains(&self, key: &C::Key) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Returns the engine, consuming the wrapper.
    pub fn into_inner(self) -> C {
        self.inner.into_inner()
    }
}

impl<C: CacheEngine> StatsSource for AutoLockCache<C> {
    fn take_stats(&self) -> CacheStats {
        self.stats()
    }
}

impl<C: fmt::Debug> fmt::Debug for AutoLockCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(engine) => f.debug_tuple("AutoLockCache").field(&*engine).finish(),
            None => f.write_str("AutoLockCache(<locked>)"),
        }
    }
}

/// Cloneable handle to an engine shared between threads.
///
/// Single operations lock internally like [`AutoLockCache`]. For several
/// operations that must not interleave with other threads, take a
/// [`CacheGuard`] with [`lock`](Self::lock) and call the engine directly.
pub struct SharedCache<C> {
    inner: Arc<Mutex<C>>,
}

impl<C: CacheEngine> SharedCache<C> {
    pub fn new(engine: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Blocks until the engine is free and returns exclusive access to it.
    pub fn lock(&self) -> CacheGuard<'_, C> {
        CacheGuard {
            guard: self.inner.lock(),
        }
    }

    /// Returns exclusive access if no other thread holds the lock.
    pub fn try_lock(&self) -> Option<CacheGuard<'_, C>> {
        self.inner.try_lock().map(|guard| CacheGuard { guard })
    }

    pub fn set(&self, key: C::Key, value: C::Value) {
        self.inner.lock().set(key, value);
    }

    pub fn get(&self, key: &C::Key) -> Option<C::Value>
    where
        C::Value: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    pub fn remove(&self, key: &C::Key) -> Option<C::Value> {
        self.inner.lock().remove(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn totals(&self) -> CacheStats {
        self.inner.lock().totals()
    }

    pub fn contains(&self, key: &C::Key) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }
}

impl<C> Clone for SharedCache<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: CacheEngine> StatsSource for SharedCache<C> {
    fn take_stats(&self) -> CacheStats {
        self.stats()
    }
}

impl<C: fmt::Debug> fmt::Debug for SharedCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(engine) => f.debug_tuple("SharedCache").field(&*engine).finish(),
            None => f.write_str("SharedCache(<locked>)"),
        }
    }
}

/// Exclusive access to a [`SharedCache`] engine.
///
/// Derefs to the engine. The lock is released by [`unlock`](Self::unlock) or
/// when the guard is dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct CacheGuard<'a, C> {
    guard: MutexGuard<'a, C>,
}

impl<C> CacheGuard<'_, C> {
    /// Releases the lock.
    pub fn unlock(self) {
        drop(self);
    }
}

impl<C> Deref for CacheGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.guard
    }
}

impl<C> DerefMut for CacheGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.guard
    }
}

impl<C: fmt::Debug> fmt::Debug for CacheGuard<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CacheGuard").field(&*self.guard).finish()
    }
}

/// Callers that batch through their own mutex can still feed a reporter.
impl<C: CacheEngine> StatsSource for Mutex<C> {
    fn take_stats(&self) -> CacheStats {
        self.lock().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::lfu::LfuCache;
    use crate::policy::lru::LruCache;
    use std::thread;

    #[test]
    fn auto_lock_round_trip() {
        let cache = AutoLockCache::new(LruCache::new(4).unwrap());
        cache.set("a", 1);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), None);
        assert!(cache.contains(&"a"));
        assert_eq!(cache.remove(&"a"), Some(1));
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 4);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.sets), (1, 1, 1));
        assert!(cache.take_stats().is_quiet());
    }

    #[test]
    fn auto_lock_into_inner_keeps_state() {
        let cache = AutoLockCache::new(LfuCache::new(3).unwrap());
        cache.set(1u8, 'x');
        let engine = cache.into_inner();
        assert_eq!(engine.peek(&1), Some(&'x'));
    }

    #[test]
    fn shared_cache_concurrent_writers() {
        let cache = SharedCache::new(LfuCache::new(1_000).unwrap());
        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..100u32 {
                        cache.set(t * 100 + i, i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 400);
        assert_eq!(cache.totals().sets, 400);
        cache.lock().check_invariants().unwrap();
    }

    #[test]
    fn guard_exposes_engine_and_unlocks() {
        let cache = SharedCache::new(LruCache::new(2).unwrap());
        let mut guard = cache.lock();
        guard.set(1, 10);
        guard.set(2, 20);
        assert_eq!(guard.get(&1), Some(&10));
        assert!(cache.try_lock().is_none());
        guard.unlock();

        assert!(cache.try_lock().is_some());
        assert_eq!(cache.get(&2), Some(20));
    }

    #[test]
    fn mutex_is_a_stats_source() {
        let engine = Mutex::new(LruCache::new(2).unwrap());
        engine.lock().set('k', ());
        let stats = engine.take_stats();
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.len, 1);
    }

    #[test]
    fn debug_does_not_block_when_locked() {
        let cache = SharedCache::new(LruCache::<u8, u8>::new(2).unwrap());
        let _guard = cache.lock();
        assert_eq!(format!("{:?}", cache), "SharedCache(<locked>)");
    }
}

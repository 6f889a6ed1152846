//! Optional observer callbacks invoked by the engines.
//!
//! Every hook is optional; an unset hook costs one branch and is never called.
//! Hooks run synchronously inside the engine operation that triggered them.
//! When the engine sits behind [`AutoLockCache`](crate::concurrent::AutoLockCache)
//! or [`SharedCache`](crate::concurrent::SharedCache) that means they run with
//! the lock held: a hook must not call back into the same cache or it will
//! deadlock.
//!
//! ## Fill-level reporting
//!
//! After a length change that is not an eviction (`set` of a new key without
//! eviction, `remove`, `clear`), the engine computes `len * 100 / capacity`
//! rounded down and calls `on_fill_level` only if the value differs from the
//! last one reported. The initial reference value is 0, so an empty cache
//! never reports until something is inserted.

use std::fmt;

pub type HitHook<K, V> = Box<dyn FnMut(&K, &V) + Send>;
pub type MissHook<K> = Box<dyn FnMut(&K) + Send>;
pub type EvictHook<K, V> = Box<dyn FnMut(&K, &V) + Send>;
pub type FillLevelHook = Box<dyn FnMut(u8) + Send>;

/// Set of optional observer callbacks for one engine.
///
/// ```
/// use evictkit::hooks::CacheHooks;
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use std::sync::Arc;
///
/// let misses = Arc::new(AtomicU64::new(0));
/// let seen = Arc::clone(&misses);
/// let hooks: CacheHooks<u32, String> = CacheHooks::new()
///     .on_miss(move |_key| {
///         seen.fetch_add(1, Ordering::Relaxed);
///     });
/// assert!(hooks.has_miss_hook());
/// ```
pub struct CacheHooks<K, V> {
    on_hit: Option<HitHook<K, V>>,
    on_miss: Option<MissHook<K>>,
    on_evict: Option<EvictHook<K, V>>,
    on_fill_level: Option<FillLevelHook>,
    last_fill_level: u8,
}

impl<K, V> CacheHooks<K, V> {
    /// Creates an empty hook set.
    pub fn new() -> Self {
        Self {
            on_hit: None,
            on_miss: None,
            on_evict: None,
            on_fill_level: None,
            last_fill_level: 0,
        }
    }

    /// Called with the key and value on every `get` hit.
    pub fn on_hit(mut self, f: impl FnMut(&K, &V) + Send + 'static) -> Self {
        self.on_hit = Some(Box::new(f));
        self
    }

    /// Called with the key on every `get` miss.
    pub fn on_miss(mut self, f: impl FnMut(&K) + Send + 'static) -> Self {
        self.on_miss = Some(Box::new(f));
        self
    }

    /// Called with the evicted entry on capacity eviction and TTL expiry.
    pub fn on_evict(mut self, f: impl FnMut(&K, &V) + Send + 'static) -> Self {
        self.on_evict = Some(Box::new(f));
        self
    }

    /// Called with the new fill percentage (0..=100) when it changes.
    pub fn on_fill_level(mut self, f: impl FnMut(u8) + Send + 'static) -> Self {
        self.on_fill_level = Some(Box::new(f));
        self
    }

    pub fn has_hit_hook(&self) -> bool {
        self.on_hit.is_some()
    }

    pub fn has_miss_hook(&self) -> bool {
        self.on_miss.is_some()
    }

    pub fn has_evict_hook(&self) -> bool {
        self.on_evict.is_some()
    }

    pub fn has_fill_level_hook(&self) -> bool {
        self.on_fill_level.is_some()
    }

    #[inline]
    pub(crate) fn hit(&mut self, key: &K, value: &V) {
        if let Some(f) = self.on_hit.as_mut() {
            f(key, value);
        }
    }

    #[inline]
    pub(crate) fn miss(&mut self, key: &K) {
        if let Some(f) = self.on_miss.as_mut() {
            f(key);
        }
    }

    #[inline]
    pub(crate) fn evict(&mut self, key: &K, value: &V) {
        if let Some(f) = self.on_evict.as_mut() {
            f(key, value);
        }
    }

    /// Reports the fill level if an observer is set and the percentage moved.
    pub(crate) fn fill_level(&mut self, len: usize, capacity: usize) {
        let Some(f) = self.on_fill_level.as_mut() else {
            return;
        };
        let percent = fill_percent(len, capacity);
        if percent != self.last_fill_level {
            self.last_fill_level = percent;
            f(percent);
        }
    }
}

/// `len * 100 / capacity` rounded down, saturating at 100.
pub(crate) fn fill_percent(len: usize, capacity: usize) -> u8 {
    if capacity == 0 {
        return 0;
    }
    let percent = (len as u128 * 100) / capacity as u128;
    percent.min(100) as u8
}

impl<K, V> Default for CacheHooks<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for CacheHooks<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHooks")
            .field("on_hit", &self.on_hit.is_some())
            .field("on_miss", &self.on_miss.is_some())
            .field("on_evict", &self.on_evict.is_some())
            .field("on_fill_level", &self.on_fill_level.is_some())
            .field("last_fill_level", &self.last_fill_level)
            .finish()
    }
}

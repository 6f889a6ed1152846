use crate::metrics::snapshot::CacheStats;

#[derive(Debug, Default, Clone, Copy)]
struct EventCounts {
    hits: u64,
    misses: u64,
    evictions: u64,
    gets: u64,
    sets: u64,
}

/// Per-engine event counters.
///
/// Keeps two sets of counts: a delta window drained by
/// [`take_delta`](Self::take_delta) and a running total read by
/// [`totals`](Self::totals). Both are zeroed by [`reset`](Self::reset).
///
/// Not synchronized; the owning engine is protected by whatever lock wraps it.
#[derive(Debug, Default)]
pub struct StatsCounters {
    delta: EventCounts,
    total: EventCounts,
}

impl StatsCounters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_hit(&mut self) {
        self.delta.hits += 1;
        self.total.hits += 1;
    }

    #[inline]
    pub fn record_miss(&mut self) {
        self.delta.misses += 1;
        self.total.misses += 1;
    }

    #[inline]
    pub fn record_eviction(&mut self) {
        self.delta.evictions += 1;
        self.total.evictions += 1;
    }

    #[inline]
    pub fn record_get(&mut self) {
        self.delta.gets += 1;
        self.total.gets += 1;
    }

    #[inline]
    pub fn record_set(&mut self) {
        self.delta.sets += 1;
        self.total.sets += 1;
    }

    /// Returns the delta window with the given gauges and starts a new window.
    pub fn take_delta(&mut self, len: usize, capacity: usize) -> CacheStats {
        let counts = std::mem::take(&mut self.delta);
        Self::to_stats(counts, len, capacity)
    }

    /// Returns cumulative counts without touching the delta window.
    pub fn totals(&self, len: usize, capacity: usize) -> CacheStats {
        Self::to_stats(self.total, len, capacity)
    }

    /// Zeroes both the delta window and the running totals.
    pub fn reset(&mut self) {
        self.delta = EventCounts::default();
        self.total = EventCounts::default();
    }

    fn to_stats(counts: EventCounts, len: usize, capacity: usize) -> CacheStats {
        CacheStats {
            capacity,
            len,
            hits: counts.hits,
            misses: counts.misses,
            evictions: counts.evictions,
            gets: counts.gets,
            sets: counts.sets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_delta_resets_window_only() {
        let mut counters = StatsCounters::new();
        counters.record_set();
        counters.record_get();
        counters.record_hit();

        let first = counters.take_delta(1, 4);
        assert_eq!(first.sets, 1);
        assert_eq!(first.gets, 1);
        assert_eq!(first.hits, 1);
        assert_eq!(first.len, 1);
        assert_eq!(first.capacity, 4);

        let second = counters.take_delta(1, 4);
        assert!(second.is_quiet());
        assert_eq!(second.len, 1);

        let totals = counters.totals(1, 4);
        assert_eq!(totals.sets, 1);
        assert_eq!(totals.hits, 1);
    }

    #[test]
    fn reset_clears_totals() {
        let mut counters = StatsCounters::new();
        counters.record_miss();
        counters.record_eviction();
        counters.reset();
        assert!(counters.totals(0, 2).is_quiet());
        assert!(counters.take_delta(0, 2).is_quiet());
    }
}

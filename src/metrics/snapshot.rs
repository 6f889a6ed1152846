/// Point-in-time view of an engine's statistics.
///
/// Event counters (`hits`, `misses`, `evictions`, `gets`, `sets`) are either
/// deltas since the previous delta read or cumulative totals, depending on
/// which read produced the snapshot. `len` and `capacity` are gauges captured
/// at read time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheStats {
    pub capacity: usize,
    pub len: usize,

    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub gets: u64,
    pub sets: u64,
}

impl CacheStats {
    /// Fraction of `gets` that were hits, or `None` when nothing was read.
    ///
    /// TTL expiries count toward `gets` but neither `hits` nor `misses`.
    pub fn hit_ratio(&self) -> Option<f64> {
        if self.gets == 0 {
            None
        } else {
            Some(self.hits as f64 / self.gets as f64)
        }
    }

    /// Returns `true` if no events were recorded.
    pub fn is_quiet(&self) -> bool {
        self.hits == 0
            && self.misses == 0
            && self.evictions == 0
            && self.gets == 0
            && self.sets == 0
    }
}

//! Hit/access accounting for cache lookups.
//!
//! Counters only track lookups (`get`): inserts, removals and touches leave
//! them alone. The hit rate is `hits / accesses * 100`, reported as `0.0`
//! rather than NaN while no lookup has happened yet.

/// Running hit/access counters owned by a cache core.
///
/// Every 20th access a hit-rate diagnostic is emitted at `debug` level via
/// [`tracing`]. With no subscriber installed the line is a no-op.
#[derive(Debug, Default)]
pub struct HitStats {
    hits: u64,
    accesses: u64,
}

/// Emit a diagnostic line once per this many accesses.
const LOG_EVERY: u64 = 20;

impl HitStats {
    /// Records one lookup and whether it hit.
    pub fn record(&mut self, hit: bool) {
        self.accesses += 1;
        if hit {
            self.hits += 1;
        }
        if self.accesses % LOG_EVERY == 0 {
            tracing::debug!(
                accesses = self.accesses,
                hits = self.hits,
                hit_rate = format_args!("{:.2}%", self.hit_rate()),
                "cache hit rate"
            );
        }
    }

    /// Number of successful lookups so far.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Total number of lookups so far, hits and misses.
    #[inline]
    pub fn accesses(&self) -> u64 {
        self.accesses
    }

    /// Hit rate as a percentage in `[0.0, 100.0]`.
    ///
    /// Returns `0.0` when no lookup has been recorded.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            return 0.0;
        }
        (self.hits as f64 / self.accesses as f64) * 100.0
    }
}

/// Point-in-time copy of a cache's counters and occupancy.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use cachebound::policy::lru::LruCore;
/// use cachebound::traits::CoreCache;
///
/// let mut cache: LruCore<u64, &str> = LruCore::new(10);
/// cache.insert(1, Arc::new("one"));
/// cache.get(&1);
/// cache.get(&2);
///
/// let snap = cache.stats();
/// assert_eq!(snap.hits, 1);
/// assert_eq!(snap.accesses, 2);
/// assert_eq!(snap.hit_rate, 50.0);
/// assert_eq!(snap.len, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    /// Successful lookups.
    pub hits: u64,
    /// Total lookups.
    pub accesses: u64,
    /// `hits / accesses * 100`, `0.0` when `accesses == 0`.
    pub hit_rate: f64,
    /// Entry count at snapshot time.
    pub len: usize,
    /// Capacity at snapshot time.
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_stats_are_zero() {
        let stats = HitStats::default();
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.accesses(), 0);
    }

    #[test]
    fn hit_rate_avoids_nan_with_no_accesses() {
        let stats = HitStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn record_hit_increments_both_counters() {
        let mut stats = HitStats::default();
        stats.record(true);
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.accesses(), 1);
    }

    #[test]
    fn record_miss_increments_only_accesses() {
        let mut stats = HitStats::default();
        stats.record(false);
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.accesses(), 1);
    }

    #[test]
    fn hit_rate_is_percentage() {
        let mut stats = HitStats::default();
        stats.record(true);
        stats.record(true);
        stats.record(false);
        stats.record(false);
        assert_eq!(stats.hit_rate(), 50.0);
    }

    #[test]
    fn hit_rate_all_hits_is_hundred() {
        let mut stats = HitStats::default();
        for _ in 0..7 {
            stats.record(true);
        }
        assert_eq!(stats.hit_rate(), 100.0);
    }

    #[test]
    fn record_past_log_threshold_keeps_counting() {
        let mut stats = HitStats::default();
        for i in 0..45 {
            stats.record(i % 3 == 0);
        }
        assert_eq!(stats.accesses(), 45);
        assert_eq!(stats.hits(), 15);
    }
}

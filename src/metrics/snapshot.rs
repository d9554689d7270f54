/// Point-in-time copy of the engine's counters plus size gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evicted_entries: u64,

    pub remove_calls: u64,
    pub remove_found: u64,
    pub pop_lru_found: u64,

    pub producer_calls: u64,
    pub producer_errors: u64,

    pub repairs: u64,
    pub rebases: u64,
    pub resizes: u64,
    pub clears: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

impl LruMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before the first call.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_ratio_handles_zero_calls() {
        let snapshot = LruMetricsSnapshot::default();
        assert_eq!(snapshot.hit_ratio(), 0.0);
    }

    #[test]
    fn hit_ratio_divides_hits_by_calls() {
        let snapshot = LruMetricsSnapshot {
            get_calls: 4,
            get_hits: 3,
            get_misses: 1,
            ..Default::default()
        };
        assert!((snapshot.hit_ratio() - 0.75).abs() < f64::EPSILON);
    }
}

use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{CoreMetricsRecorder, LruMetricsRecorder, MetricsReset};

#[derive(Debug, Default)]
pub struct LruMetrics {
    pub get_calls: MetricsCell,
    pub get_hits: MetricsCell,
    pub get_misses: MetricsCell,
    pub insert_calls: MetricsCell,
    pub insert_updates: MetricsCell,
    pub insert_new: MetricsCell,
    pub evicted_entries: MetricsCell,
    pub remove_calls: MetricsCell,
    pub remove_found: MetricsCell,
    pub pop_lru_found: MetricsCell,
    pub producer_calls: MetricsCell,
    pub producer_errors: MetricsCell,
    pub repairs: MetricsCell,
    pub rebases: MetricsCell,
    pub resizes: MetricsCell,
    pub clears: MetricsCell,
}

impl CoreMetricsRecorder for LruMetrics {
    fn record_get_hit(&self) {
        self.get_calls.incr();
        self.get_hits.incr();
    }

    fn record_get_miss(&self) {
        self.get_calls.incr();
        self.get_misses.incr();
    }

    fn record_insert_call(&self) {
        self.insert_calls.incr();
    }

    fn record_insert_new(&self) {
        self.insert_new.incr();
    }

    fn record_insert_update(&self) {
        self.insert_updates.incr();
    }

    fn record_evicted_entry(&self) {
        self.evicted_entries.incr();
    }

    fn record_clear(&self) {
        self.clears.incr();
    }
}

impl LruMetricsRecorder for LruMetrics {
    fn record_remove_call(&self) {
        self.remove_calls.incr();
    }

    fn record_remove_found(&self) {
        self.remove_found.incr();
    }

    fn record_producer_call(&self) {
        self.producer_calls.incr();
    }

    fn record_producer_error(&self) {
        self.producer_errors.incr();
    }

    fn record_pop_lru_found(&self) {
        self.pop_lru_found.incr();
    }

    fn record_repair(&self) {
        self.repairs.incr();
    }

    fn record_rebase(&self) {
        self.rebases.incr();
    }

    fn record_resize(&self) {
        self.resizes.incr();
    }
}

impl MetricsReset for LruMetrics {
    fn reset_metrics(&self) {
        for cell in [
            &self.get_calls,
            &self.get_hits,
            &self.get_misses,
            &self.insert_calls,
            &self.insert_updates,
            &self.insert_new,
            &self.evicted_entries,
            &self.remove_calls,
            &self.remove_found,
            &self.pop_lru_found,
            &self.producer_calls,
            &self.producer_errors,
            &self.repairs,
            &self.rebases,
            &self.resizes,
            &self.clears,
        ] {
            cell.reset();
        }
    }
}

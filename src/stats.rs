//! Per-processor statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::cache::CacheStats;

/// Snapshot of a processor's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Extraction calls, successful or not, including cache hits.
    pub documents_processed: u64,
    /// Calls that returned an error.
    pub failures: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Entries currently held by the cache.
    pub cache_entries: usize,
}

impl Statistics {
    /// Fraction of cache lookups that hit, or `0.0` before any lookup.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}

/// Processor-side counters; cache counters live in the cache.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    documents_processed: AtomicU64,
    failures: AtomicU64,
}

impl Counters {
    pub(crate) fn record<T, E>(&self, outcome: &Result<T, E>) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        if outcome.is_err() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self, cache: CacheStats) -> Statistics {
        Statistics {
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            cache_hits: cache.hits,
            cache_misses: cache.misses,
            evictions: cache.evictions,
            expirations: cache.expirations,
            cache_entries: cache.entries,
        }
    }

    pub(crate) fn reset(&self) {
        self.documents_processed.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
    }
}

//! Cache Statistics Module
//!
//! Tracks cache performance metrics: hits, misses, factory populations,
//! coalesced single-flight waits and expired removals.

use serde::Serialize;

// == Cache Stats ==
/// Performance counters maintained by the facade.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of reads answered from a live entry
    pub hits: u64,
    /// Number of reads that found no live entry (missing or expired)
    pub misses: u64,
    /// Number of factory executions started by get-or-create
    pub populations: u64,
    /// Number of get-or-create calls that joined an in-flight population
    pub coalesced_waits: u64,
    /// Number of entries removed because their TTL had elapsed
    pub expired_removals: u64,
    /// Current number of entries in the store
    pub entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates stats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Population ==
    /// Counts one factory execution.
    pub fn record_population(&mut self) {
        self.populations += 1;
    }

    // == Record Coalesced Wait ==
    /// Counts one caller that piggybacked on an in-flight population.
    pub fn record_coalesced_wait(&mut self) {
        self.coalesced_waits += 1;
    }

    // == Record Expired ==
    /// Counts entries removed by expiry, lazily or by the sweeper.
    pub fn record_expired(&mut self, count: u64) {
        self.expired_removals += count;
    }

    // == Update Entry Count ==
    pub fn set_entries(&mut self, count: usize) {
        self.entries = count;
    }
}

//! Cache Statistics Module
//!
//! Running counters plus the snapshot reported to monitoring callers.

use serde::Serialize;

/// Maximum number of entries listed in `CacheStats::top_items`.
pub const TOP_ITEMS_LIMIT: usize = 10;

// == Cache Counters ==
/// Running performance counters, reset by `clear`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheCounters {
    /// Successful reads
    pub hits: u64,
    /// Reads of absent or expired keys
    pub misses: u64,
    /// Insertions and overwrites
    pub sets: u64,
    /// Entries removed by the LRU policy
    pub evictions: u64,
}

impl CacheCounters {
    // == Constructor ==
    /// Creates counters with every value at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Hit Rate ==
    /// Hit rate as a percentage, or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        percentage(self.hits, self.hits + self.misses)
    }

    // == Miss Rate ==
    /// Miss rate as a percentage, or 0.0 if no reads have been made.
    pub fn miss_rate(&self) -> f64 {
        percentage(self.misses, self.hits + self.misses)
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

// == Top Item ==
/// One of the most frequently read entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopItem {
    pub key: String,
    /// Reads since the entry was stored
    pub hits: u64,
    /// Approximate footprint in bytes
    pub size_bytes: usize,
}

// == Cache Stats ==
/// Point-in-time snapshot returned by `CacheStore::stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Entries physically present, including expired ones not yet swept
    pub total_items: usize,
    /// Sum of the per-entry size estimates
    pub total_memory_bytes_estimate: usize,
    /// Percentage of reads that hit
    pub hit_rate: f64,
    /// Percentage of reads that missed
    pub miss_rate: f64,
    /// Most-read entries, highest hit count first
    pub top_items: Vec<TopItem>,
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Builds a snapshot from counters and per-entry `(key, hits, size)` rows.
    ///
    /// Rows are ranked by hit count descending, ties by key, and truncated to
    /// `TOP_ITEMS_LIMIT`.
    pub fn from_parts(counters: &CacheCounters, mut rows: Vec<TopItem>) -> Self {
        let total_items = rows.len();
        let total_memory_bytes_estimate = rows.iter().map(|r| r.size_bytes).sum();

        rows.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.key.cmp(&b.key)));
        rows.truncate(TOP_ITEMS_LIMIT);

        Self {
            total_items,
            total_memory_bytes_estimate,
            hit_rate: counters.hit_rate(),
            miss_rate: counters.miss_rate(),
            top_items: rows,
            hits: counters.hits,
            misses: counters.misses,
            sets: counters.sets,
            evictions: counters.evictions,
        }
    }
}

//! Cache Statistics Module
//!
//! Tracks per-process cache outcomes (hits, misses, corrupt entries, writes)
//! and defines the diagnostic report returned by `ResultCache::stats`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Counters ==
/// Lock-free outcome counters shared by every clone of a cache handle.
#[derive(Debug, Default)]
pub struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    corrupt_entries: AtomicU64,
    writes: AtomicU64,
    write_failures: AtomicU64,
}

impl CacheCounters {
    // == Constructor ==
    /// Creates counters with every value at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Corrupt ==
    /// Counts a stored entry that failed to decode. Also counts as a miss.
    pub fn record_corrupt(&self) {
        self.corrupt_entries.fetch_add(1, Ordering::Relaxed);
        self.record_miss();
    }

    // == Record Write ==
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Write Failure ==
    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> CounterSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        CounterSnapshot {
            hits,
            misses,
            corrupt_entries: self.corrupt_entries.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            hit_rate: hit_rate(hits, misses),
        }
    }
}

/// hits / (hits + misses), or 0.0 if no lookups have been made.
fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

// == Counter Snapshot ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CounterSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub corrupt_entries: u64,
    pub writes: u64,
    pub write_failures: u64,
    pub hit_rate: f64,
}

// == Cache Report ==
/// Diagnostic snapshot of the cache and its backing store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheReport {
    /// Whether the backing store answered the startup probe
    pub enabled: bool,
    /// Backing store provider name
    pub backend: String,
    /// Keys across every category namespace
    pub total_keys: u64,
    /// Keys per category namespace
    pub keys_by_category: BTreeMap<String, u64>,
    /// Store-wide memory usage in bytes
    pub memory_used_bytes: u64,
    /// `memory_used_bytes` in megabytes, e.g. "1.50 MB"
    pub memory_used: String,
    /// Set when gathering backend figures failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Outcomes recorded by this process
    pub counters: CounterSnapshot,
}

impl CacheReport {
    /// Canned report for a degraded cache.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            backend: "disabled".to_string(),
            total_keys: 0,
            keys_by_category: BTreeMap::new(),
            memory_used_bytes: 0,
            memory_used: format_megabytes(0),
            error: None,
            counters: CounterSnapshot::default(),
        }
    }
}

/// Formats a byte count as megabytes with two decimals.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_new() {
        let snapshot = CacheCounters::new().snapshot();
        assert_eq!(snapshot, CounterSnapshot::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheCounters::new().snapshot().hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let counters = CacheCounters::new();
        counters.record_hit();
        counters.record_hit();
        counters.record_hit();
        assert_eq!(counters.snapshot().hit_rate, 1.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let counters = CacheCounters::new();
        counters.record_hit();
        counters.record_miss();
        assert_eq!(counters.snapshot().hit_rate, 0.5);
    }

    #[test]
    fn test_corrupt_counts_as_miss() {
        let counters = CacheCounters::new();
        counters.record_corrupt();

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.corrupt_entries, 1);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.hits, 0);
    }

    #[test]
    fn test_write_counters() {
        let counters = CacheCounters::new();
        counters.record_write();
        counters.record_write_failure();
        counters.record_write_failure();

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.writes, 1);
        assert_eq!(snapshot.write_failures, 2);
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(0), "0.00 MB");
        assert_eq!(format_megabytes(1024 * 1024 * 3 / 2), "1.50 MB");
    }

    #[test]
    fn test_disabled_report() {
        let report = CacheReport::disabled();
        assert!(!report.enabled);
        assert_eq!(report.total_keys, 0);
        assert_eq!(report.memory_used_bytes, 0);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["memory_used"], "0.00 MB");
    }
}

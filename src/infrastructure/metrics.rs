//! Ingest metrics
//!
//! Lock-free counters updated from the ingest path with relaxed ordering.
//! Snapshots are derived on demand for the stats API.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters for the ingest path
#[derive(Debug, Default)]
pub struct MetricsCollector {
    /// Cumulative event count
    total_updates: AtomicU64,
    /// Cumulative wall time spent in the ingest path
    total_processing_time_ns: AtomicU64,
    /// Events since the last stats snapshot (read-and-reset)
    updates_last_second: AtomicU64,
    /// Malformed events dropped before ingest
    dropped_events: AtomicU64,
    /// New-symbol inserts refused at the registry capacity bound
    rejected_symbols: AtomicU64,
}

/// Derived stats snapshot for the query API
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_symbols: usize,
    pub threshold_symbols: usize,
    pub updates_per_second: u64,
    pub avg_processing_time_us: f64,
    pub memory_usage_bytes: usize,
    pub dropped_events: u64,
    pub rejected_symbols: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed event and its ingest latency
    #[inline]
    pub fn record_update(&self, processing_time_ns: u64) {
        self.total_updates.fetch_add(1, Ordering::Relaxed);
        self.total_processing_time_ns
            .fetch_add(processing_time_ns, Ordering::Relaxed);
        self.updates_last_second.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a malformed event dropped at the door
    #[inline]
    pub fn record_dropped(&self) {
        self.dropped_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a new symbol refused at the capacity bound
    #[inline]
    pub fn record_rejected_symbol(&self) {
        self.rejected_symbols.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_updates(&self) -> u64 {
        self.total_updates.load(Ordering::Relaxed)
    }

    /// Build a stats snapshot
    ///
    /// `updates_per_second` is the event count since the previous snapshot;
    /// reading it resets the counter. `per_symbol_bytes` is the estimated
    /// footprint of one tracked symbol.
    pub fn snapshot(
        &self,
        total_symbols: usize,
        threshold_symbols: usize,
        per_symbol_bytes: usize,
    ) -> Stats {
        let total = self.total_updates.load(Ordering::Relaxed);
        let total_time_ns = self.total_processing_time_ns.load(Ordering::Relaxed);

        let avg_us = if total > 0 {
            (total_time_ns / total) as f64 / 1_000.0
        } else {
            0.0
        };

        Stats {
            total_symbols,
            threshold_symbols,
            updates_per_second: self.updates_last_second.swap(0, Ordering::Relaxed),
            avg_processing_time_us: avg_us,
            memory_usage_bytes: total_symbols * per_symbol_bytes,
            dropped_events: self.dropped_events.load(Ordering::Relaxed),
            rejected_symbols: self.rejected_symbols.load(Ordering::Relaxed),
        }
    }
}

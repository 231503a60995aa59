//! Alert-band membership
//!
//! Maps each symbol inside the alert band to its latest published snapshot.
//! Publication is hysteresis-gated and the emit hook runs while the writer
//! lock is held, so the snapshot observed by a listener is exactly the one
//! stored.

use crate::core::AlertSnapshot;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Default)]
pub struct ThresholdSet {
    inner: RwLock<HashMap<String, AlertSnapshot>>,
}

impl ThresholdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `snapshot` and invoke `emit` unless the symbol already has a
    /// snapshot within `hysteresis` percentage points of the new one
    ///
    /// Returns true when the snapshot was stored (and emitted). `emit` runs
    /// under the writer lock and must not call back into the ingest path.
    pub fn publish<F>(&self, snapshot: AlertSnapshot, hysteresis: f64, emit: F) -> bool
    where
        F: FnOnce(&AlertSnapshot),
    {
        let mut inner = self.inner.write();

        if let Some(stored) = inner.get(&snapshot.symbol) {
            if (stored.change_percent - snapshot.change_percent).abs() <= hysteresis {
                return false;
            }
        }

        emit(&snapshot);
        inner.insert(snapshot.symbol.clone(), snapshot);
        true
    }

    /// Drop a symbol that left the band. No emission on exit.
    pub fn remove(&self, symbol: &str) -> bool {
        self.inner.write().remove(symbol).is_some()
    }

    /// Drop every listed symbol (reaper path)
    pub fn remove_many(&self, symbols: &[String]) {
        if symbols.is_empty() {
            return;
        }
        let mut inner = self.inner.write();
        for symbol in symbols {
            inner.remove(symbol);
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.inner.read().contains_key(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<AlertSnapshot> {
        self.inner.read().get(symbol).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All snapshots, change percent descending, ties by symbol ascending
    pub fn snapshot_sorted(&self) -> Vec<AlertSnapshot> {
        let mut all: Vec<AlertSnapshot> = self.inner.read().values().cloned().collect();
        all.sort_by(|a, b| {
            b.change_percent
                .partial_cmp(&a.change_percent)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(symbol: &str, change: f64) -> AlertSnapshot {
        AlertSnapshot {
            symbol: symbol.to_string(),
            change_percent: change,
            current_price: 110.0,
            min_price: 100.0,
            max_price: 110.0,
            volume: 1_000,
            timestamp_ms: 1,
            deep_link: String::new(),
        }
    }

    #[test]
    fn test_first_publish_emits() {
        let set = ThresholdSet::new();
        let mut emitted = 0;

        assert!(set.publish(snapshot("AAPL", 10.0), 0.1, |_| emitted += 1));
        assert_eq!(emitted, 1);
        assert!(set.contains("AAPL"));
    }

    #[test]
    fn test_hysteresis_suppresses_small_moves() {
        let set = ThresholdSet::new();
        let mut emitted = 0;

        set.publish(snapshot("AAPL", 10.0), 0.1, |_| emitted += 1);
        // 0.05 below the delta: no write, no emit
        assert!(!set.publish(snapshot("AAPL", 10.05), 0.1, |_| emitted += 1));
        assert_eq!(emitted, 1);
        assert_eq!(set.get("AAPL").unwrap().change_percent, 10.0);

        // 1.0 above the delta: both
        assert!(set.publish(snapshot("AAPL", 11.0), 0.1, |_| emitted += 1));
        assert_eq!(emitted, 2);
        assert_eq!(set.get("AAPL").unwrap().change_percent, 11.0);
    }

    #[test]
    fn test_emit_sees_stored_value() {
        let set = ThresholdSet::new();
        set.publish(snapshot("AAPL", 9.5), 0.1, |emitted| {
            assert_eq!(emitted.symbol, "AAPL");
            assert_eq!(emitted.change_percent, 9.5);
        });
        assert_eq!(set.get("AAPL").unwrap().change_percent, 9.5);
    }

    #[test]
    fn test_remove() {
        let set = ThresholdSet::new();
        set.publish(snapshot("AAPL", 10.0), 0.1, |_| {});

        assert!(set.remove("AAPL"));
        assert!(!set.remove("AAPL"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_many() {
        let set = ThresholdSet::new();
        set.publish(snapshot("AAPL", 10.0), 0.1, |_| {});
        set.publish(snapshot("MSFT", 11.0), 0.1, |_| {});
        set.publish(snapshot("GOOG", 12.0), 0.1, |_| {});

        set.remove_many(&["AAPL".to_string(), "GOOG".to_string()]);
        assert_eq!(set.len(), 1);
        assert!(set.contains("MSFT"));
    }

    #[test]
    fn test_snapshot_sorted_by_change_then_symbol() {
        let set = ThresholdSet::new();
        set.publish(snapshot("MSFT", 9.5), 0.1, |_| {});
        set.publish(snapshot("AAPL", 12.0), 0.1, |_| {});
        set.publish(snapshot("ABNB", 9.5), 0.1, |_| {});

        let sorted = set.snapshot_sorted();
        let symbols: Vec<&str> = sorted.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "ABNB", "MSFT"]);
    }
}

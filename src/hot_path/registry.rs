//! Symbol registry
//!
//! Concurrent map from uppercase symbol to its rolling state. Steady-state
//! lookups take the shared lock only; first touch of a symbol upgrades to
//! the exclusive lock with a re-check, so two threads racing on the same new
//! symbol produce exactly one state.

use crate::hot_path::SymbolState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub struct SymbolRegistry {
    stocks: RwLock<HashMap<String, Arc<SymbolState>>>,
    /// Capacity of each symbol's ring buffer
    buffer_size: usize,
    /// Registry admission bound
    max_symbols: usize,
}

impl SymbolRegistry {
    pub fn new(buffer_size: usize, max_symbols: usize) -> Self {
        Self {
            stocks: RwLock::new(HashMap::with_capacity(max_symbols.min(1024))),
            buffer_size,
            max_symbols,
        }
    }

    /// Look up a symbol's state, creating it on first touch
    ///
    /// Returns `None` when the symbol is new and the registry is already at
    /// capacity; existing symbols are always returned.
    pub fn get_or_create(&self, symbol: &str) -> Option<Arc<SymbolState>> {
        {
            let stocks = self.stocks.read();
            if let Some(state) = stocks.get(symbol) {
                return Some(Arc::clone(state));
            }
        }

        let mut stocks = self.stocks.write();
        // Re-check under the exclusive lock: another thread may have won the
        // race between our read and write acquisitions.
        if let Some(state) = stocks.get(symbol) {
            return Some(Arc::clone(state));
        }

        if stocks.len() >= self.max_symbols {
            return None;
        }

        let state = Arc::new(SymbolState::new(self.buffer_size));
        stocks.insert(symbol.to_string(), Arc::clone(&state));
        Some(state)
    }

    /// Look up without creating
    pub fn get(&self, symbol: &str) -> Option<Arc<SymbolState>> {
        self.stocks.read().get(symbol).cloned()
    }

    /// Number of tracked symbols
    pub fn len(&self) -> usize {
        self.stocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Symbols whose last append is older than `cutoff_ms` (shared lock)
    pub fn collect_idle(&self, cutoff_ms: u64) -> Vec<String> {
        self.stocks
            .read()
            .iter()
            .filter(|(_, state)| state.last_update_ms() < cutoff_ms)
            .map(|(symbol, _)| symbol.clone())
            .collect()
    }

    /// Remove the given symbols under the exclusive lock
    ///
    /// Each candidate's `last_update_ms` is re-checked before removal: a
    /// symbol that received an event after collection stays. Returns the
    /// symbols actually removed.
    pub fn remove_idle(&self, symbols: &[String], cutoff_ms: u64) -> Vec<String> {
        if symbols.is_empty() {
            return Vec::new();
        }

        let mut stocks = self.stocks.write();
        let mut removed = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let still_idle = stocks
                .get(symbol)
                .is_some_and(|state| state.last_update_ms() < cutoff_ms);
            if still_idle {
                stocks.remove(symbol);
                removed.push(symbol.clone());
            }
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PricePoint;
    use std::thread;

    #[test]
    fn test_get_or_create_returns_same_state() {
        let registry = SymbolRegistry::new(16, 100);

        let a = registry.get_or_create("AAPL").unwrap();
        let b = registry.get_or_create("AAPL").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_without_create() {
        let registry = SymbolRegistry::new(16, 100);
        assert!(registry.get("MSFT").is_none());

        registry.get_or_create("MSFT").unwrap();
        assert!(registry.get("MSFT").is_some());
    }

    #[test]
    fn test_capacity_rejects_new_symbols_only() {
        let registry = SymbolRegistry::new(16, 2);

        registry.get_or_create("AAPL").unwrap();
        registry.get_or_create("MSFT").unwrap();
        assert!(registry.get_or_create("GOOG").is_none());

        // Existing symbols are unaffected by the bound
        assert!(registry.get_or_create("AAPL").is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_first_touch_creates_one_state() {
        let registry = Arc::new(SymbolRegistry::new(16, 100));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get_or_create("TSLA").unwrap())
            })
            .collect();

        let states: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for state in &states[1..] {
            assert!(Arc::ptr_eq(&states[0], state));
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_idle_collection_and_removal() {
        let registry = SymbolRegistry::new(16, 100);
        let point = PricePoint {
            price: 10.0,
            timestamp_ms: 1,
            volume: 1,
        };

        registry
            .get_or_create("OLD")
            .unwrap()
            .append_at(point, 1_000);
        registry
            .get_or_create("HOT")
            .unwrap()
            .append_at(point, 9_000);

        let idle = registry.collect_idle(5_000);
        assert_eq!(idle, vec!["OLD".to_string()]);

        let removed = registry.remove_idle(&idle, 5_000);
        assert_eq!(removed, vec!["OLD".to_string()]);
        assert!(registry.get("OLD").is_none());
        assert!(registry.get("HOT").is_some());
    }

    #[test]
    fn test_remove_idle_recheck_spares_revived_symbol() {
        let registry = SymbolRegistry::new(16, 100);
        let point = PricePoint {
            price: 10.0,
            timestamp_ms: 1,
            volume: 1,
        };

        registry
            .get_or_create("AAPL")
            .unwrap()
            .append_at(point, 1_000);
        let idle = registry.collect_idle(5_000);
        assert_eq!(idle.len(), 1);

        // An event lands between collection and deletion
        registry.get("AAPL").unwrap().append_at(point, 8_000);

        let removed = registry.remove_idle(&idle, 5_000);
        assert!(removed.is_empty());
        assert!(registry.get("AAPL").is_some());
    }
}

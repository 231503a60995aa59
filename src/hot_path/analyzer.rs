//! Ingest path
//!
//! `process_trade` / `process_quote` are the entry points any feed thread may
//! call concurrently. Each event lands in its symbol's rolling window, the
//! in-window gain is reduced, and alert-band membership is updated with
//! hysteresis against noise. Internal failures are counted, never raised.
//!
//! Lock order, outermost first: registry, symbol state, threshold set. No
//! two symbol-state locks are ever held together.

use crate::core::{now_ms, AlertSnapshot, PricePoint, Quote, StockData, Trade};
use crate::hot_path::{reducer, SymbolRegistry, SymbolState, ThresholdSet};
use crate::infrastructure::config::Config;
use crate::infrastructure::metrics::{MetricsCollector, Stats};
use parking_lot::RwLock;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Alert listener, invoked synchronously from the ingest thread
///
/// Runs while the threshold-set writer lock is held: keep it short and never
/// call back into the analyzer from inside it.
pub type AlertCallback = Arc<dyn Fn(&AlertSnapshot) + Send + Sync>;

/// Windowed reduction of one symbol's recent prices
struct Analysis {
    change_percent: f64,
    min: f64,
    max: f64,
    current: f64,
}

/// Concurrent per-symbol rolling-window analyzer
pub struct Analyzer {
    config: Config,
    registry: SymbolRegistry,
    thresholds: ThresholdSet,
    metrics: MetricsCollector,
    alert_callback: RwLock<Option<AlertCallback>>,
    shutting_down: AtomicBool,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        let registry = SymbolRegistry::new(config.monitor.buffer_size, config.monitor.max_stocks);
        Self {
            config,
            registry,
            thresholds: ThresholdSet::new(),
            metrics: MetricsCollector::new(),
            alert_callback: RwLock::new(None),
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Ingest one trade. Never fails; malformed events are counted and
    /// dropped.
    pub fn process_trade(&self, trade: &Trade) {
        if self.shutting_down.load(Ordering::Acquire) {
            return;
        }
        let started = Instant::now();

        if !valid_trade(trade) {
            self.metrics.record_dropped();
            return;
        }

        let symbol = trade.symbol.to_uppercase();
        let Some(state) = self.registry.get_or_create(&symbol) else {
            // Registry at max_stocks: new symbols are refused, existing ones
            // keep flowing.
            self.metrics.record_rejected_symbol();
            return;
        };

        state.append(PricePoint {
            price: trade.price,
            timestamp_ms: trade.timestamp_ms,
            volume: trade.volume,
        });

        match self.analyze(&state) {
            Some(analysis) => self.apply_band_rule(&symbol, trade, &analysis),
            // A window with too few in-range points cannot hold an alert
            // open; exits are silent.
            None => {
                self.thresholds.remove(&symbol);
            }
        }

        self.metrics
            .record_update(started.elapsed().as_nanos() as u64);
    }

    /// Ingest one quote as a synthetic trade (mid price, summed sizes)
    pub fn process_quote(&self, quote: &Quote) {
        let trade = quote.clone().into_trade();
        self.process_trade(&trade);
    }

    /// Reduce the most recent in-window points for a symbol
    ///
    /// The window filter uses event timestamps; wall clock only anchors the
    /// cutoff. Returns `None` below `min_points_for_analysis`.
    fn analyze(&self, state: &SymbolState) -> Option<Analysis> {
        let monitor = &self.config.monitor;

        let points = state.recent(monitor.buffer_size);
        let cutoff = now_ms().saturating_sub(monitor.window_ms);

        let prices: Vec<f64> = points
            .iter()
            .filter(|p| p.timestamp_ms >= cutoff)
            .map(|p| p.price)
            .collect();

        if prices.len() < monitor.min_points_for_analysis {
            return None;
        }

        let current = *prices.last()?;
        let (min, max) = reducer::min_max(&prices);

        Some(Analysis {
            change_percent: reducer::change_percent(current, min),
            min,
            max,
            current,
        })
    }

    /// Membership rule: inside the band upsert-and-emit (hysteresis-gated),
    /// outside the band silently remove.
    fn apply_band_rule(&self, symbol: &str, trade: &Trade, analysis: &Analysis) {
        let monitor = &self.config.monitor;
        let in_band = analysis.change_percent >= monitor.threshold_min
            && analysis.change_percent <= monitor.threshold_max;

        if !in_band {
            self.thresholds.remove(symbol);
            return;
        }

        let alert = AlertSnapshot {
            symbol: symbol.to_string(),
            change_percent: analysis.change_percent,
            current_price: analysis.current,
            min_price: analysis.min,
            max_price: analysis.max,
            volume: trade.volume,
            timestamp_ms: now_ms(),
            deep_link: self.config.links.quote_url(symbol, &trade.exchange),
        };

        let callback = self.alert_callback.read().clone();
        self.thresholds
            .publish(alert, monitor.hysteresis_delta_percent, |stored| {
                if let Some(cb) = &callback {
                    // A panicking listener must not poison the stored
                    // snapshot or this event's accounting.
                    if catch_unwind(AssertUnwindSafe(|| cb(stored))).is_err() {
                        tracing::error!(symbol = %stored.symbol, "alert callback panicked");
                    }
                }
            });
    }

    /// Symbols currently inside the alert band, best movers first
    pub fn active_symbols(&self) -> Vec<AlertSnapshot> {
        self.thresholds.snapshot_sorted()
    }

    /// Current view of one symbol, if tracked
    ///
    /// With fewer than `min_points_for_analysis` in-window points the reply
    /// degrades to the atomically-read last price with zero change.
    pub fn symbol_data(&self, symbol: &str) -> Option<StockData> {
        let symbol = symbol.to_uppercase();
        let state = self.registry.get(&symbol)?;

        let last_update_ms = state.last_update_ms();
        let volume = state.recent(1).first().map(|p| p.volume).unwrap_or(0);

        match self.analyze(&state) {
            Some(analysis) => {
                let in_threshold = self.thresholds.contains(&symbol);
                Some(StockData {
                    symbol,
                    current_price: analysis.current,
                    change_percent: analysis.change_percent,
                    min_price: analysis.min,
                    max_price: analysis.max,
                    volume,
                    last_update_ms,
                    in_threshold,
                })
            }
            None => {
                let last_price = state.last_price();
                Some(StockData {
                    symbol,
                    current_price: last_price,
                    change_percent: 0.0,
                    min_price: last_price,
                    max_price: last_price,
                    volume,
                    last_update_ms,
                    in_threshold: false,
                })
            }
        }
    }

    /// Stats snapshot; `updates_per_second` resets on read
    pub fn stats(&self) -> Stats {
        let per_symbol_bytes = std::mem::size_of::<SymbolState>()
            + self.config.monitor.buffer_size * std::mem::size_of::<PricePoint>();
        self.metrics
            .snapshot(self.registry.len(), self.thresholds.len(), per_symbol_bytes)
    }

    pub fn set_alert_callback<F>(&self, callback: F)
    where
        F: Fn(&AlertSnapshot) + Send + Sync + 'static,
    {
        *self.alert_callback.write() = Some(Arc::new(callback));
    }

    /// One eviction pass: drop symbols idle past the inactivity horizon
    ///
    /// Collection runs under the shared registry lock; removal re-checks
    /// each candidate under the exclusive lock so a symbol revived in
    /// between stays. Returns the number of symbols evicted.
    pub fn reap_idle(&self) -> usize {
        let cutoff = now_ms().saturating_sub(self.config.monitor.inactivity_horizon_ms);

        let candidates = self.registry.collect_idle(cutoff);
        if candidates.is_empty() {
            return 0;
        }

        let removed = self.registry.remove_idle(&candidates, cutoff);
        self.thresholds.remove_many(&removed);

        if !removed.is_empty() {
            tracing::info!(count = removed.len(), "evicted inactive symbols");
        }
        removed.len()
    }

    /// Stop admitting events. In-flight calls finish; their callbacks have
    /// already run synchronously by the time they return.
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::Release);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn valid_trade(trade: &Trade) -> bool {
    trade.price.is_finite() && trade.price > 0.0 && !trade.symbol.is_empty()
}

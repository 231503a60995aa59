//! Background eviction of inactive symbols
//!
//! A single dedicated thread wakes every `reaper_interval_ms` and asks the
//! analyzer for one eviction pass. Idleness is judged on wall-clock
//! `last_update_ms`, not event time.

use crate::hot_path::Analyzer;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Handle to the eviction thread; `stop` shuts it down and joins
pub struct Reaper {
    shutdown: Arc<ReaperSignal>,
    handle: Option<JoinHandle<()>>,
}

/// Wakeable shutdown flag shared with the thread
struct ReaperSignal {
    stop: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

impl ReaperSignal {
    fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
            lock: Mutex::new(()),
            wake: Condvar::new(),
        }
    }

    /// Sleep up to `interval`, returning early on shutdown
    fn wait(&self, interval: Duration) -> bool {
        let mut guard = self.lock.lock();
        if self.stop.load(Ordering::Acquire) {
            return false;
        }
        self.wake.wait_for(&mut guard, interval);
        !self.stop.load(Ordering::Acquire)
    }

    fn trigger(&self) {
        self.stop.store(true, Ordering::Release);
        let _guard = self.lock.lock();
        self.wake.notify_all();
    }
}

impl Reaper {
    /// Spawn the eviction thread
    pub fn spawn(analyzer: Arc<Analyzer>) -> Self {
        let interval =
            Duration::from_millis(analyzer.config().monitor.reaper_interval_ms.max(1));
        let shutdown = Arc::new(ReaperSignal::new());
        let signal = Arc::clone(&shutdown);

        let handle = std::thread::Builder::new()
            .name("reaper".to_string())
            .spawn(move || {
                while signal.wait(interval) {
                    let evicted = analyzer.reap_idle();
                    if evicted > 0 {
                        tracing::debug!(evicted, "reaper tick");
                    }
                }
                tracing::debug!("reaper stopped");
            })
            .expect("failed to spawn reaper thread");

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal shutdown and join the thread
    pub fn stop(mut self) {
        self.shutdown.trigger();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.shutdown.trigger();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{now_ms, Trade};
    use crate::infrastructure::config::Config;
    use std::time::Instant;

    fn trade(symbol: &str, price: f64) -> Trade {
        Trade {
            symbol: symbol.to_string(),
            price,
            volume: 100,
            timestamp_ms: now_ms(),
            exchange: "NYSE".to_string(),
        }
    }

    #[test]
    fn test_reaper_evicts_idle_symbols() {
        let mut config = Config::default();
        config.monitor.reaper_interval_ms = 10;
        config.monitor.inactivity_horizon_ms = 20;
        let analyzer = Arc::new(Analyzer::new(config));

        for i in 0..50 {
            analyzer.process_trade(&trade(&format!("SYM{}", i), 10.0));
        }
        assert_eq!(analyzer.stats().total_symbols, 50);

        let reaper = Reaper::spawn(Arc::clone(&analyzer));

        // Wait for idleness to pass the horizon and a tick to land
        let deadline = Instant::now() + Duration::from_secs(2);
        while analyzer.stats().total_symbols > 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        reaper.stop();

        assert_eq!(analyzer.stats().total_symbols, 0);
    }

    #[test]
    fn test_reaper_spares_active_symbols() {
        let mut config = Config::default();
        config.monitor.inactivity_horizon_ms = 3_600_000;
        let analyzer = Arc::new(Analyzer::new(config));

        analyzer.process_trade(&trade("AAPL", 10.0));
        assert_eq!(analyzer.reap_idle(), 0);
        assert_eq!(analyzer.stats().total_symbols, 1);
    }

    #[test]
    fn test_stop_joins_quickly() {
        let mut config = Config::default();
        config.monitor.reaper_interval_ms = 60_000;
        let analyzer = Arc::new(Analyzer::new(config));

        let reaper = Reaper::spawn(analyzer);
        let started = Instant::now();
        reaper.stop();
        // The minute-long sleep must be interrupted, not waited out
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}

//! Market data types
//!
//! Plain copyable data carried through the ingest path. Event timestamps are
//! supplied by the upstream source in milliseconds since epoch; wall-clock
//! milliseconds come from [`now_ms`].

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since epoch
#[inline]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// One price observation. Immutable once appended to a symbol's window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PricePoint {
    /// Observed price
    pub price: f64,
    /// Event time (ms since epoch, upstream-supplied)
    pub timestamp_ms: u64,
    /// Volume attached to the observation
    pub volume: u64,
}

/// A single trade from the feed
#[derive(Debug, Clone)]
pub struct Trade {
    pub symbol: String,
    pub price: f64,
    pub volume: u64,
    /// Event time (ms since epoch)
    pub timestamp_ms: u64,
    pub exchange: String,
}

/// A bid/ask quote from the feed
///
/// Reduced to a synthetic [`Trade`] (mid price, summed sizes) before entering
/// the ingest path.
#[derive(Debug, Clone)]
pub struct Quote {
    pub symbol: String,
    pub bid_price: f64,
    pub bid_size: u64,
    pub ask_price: f64,
    pub ask_size: u64,
    /// Event time (ms since epoch)
    pub timestamp_ms: u64,
    pub exchange: String,
}

impl Quote {
    /// Fold into a synthetic trade: mid price, combined size
    pub fn into_trade(self) -> Trade {
        Trade {
            symbol: self.symbol,
            price: (self.bid_price + self.ask_price) / 2.0,
            volume: self.bid_size + self.ask_size,
            timestamp_ms: self.timestamp_ms,
            exchange: self.exchange,
        }
    }
}

/// Last reported alert state for a symbol inside the alert band
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSnapshot {
    pub symbol: String,
    pub change_percent: f64,
    pub current_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub volume: u64,
    /// Wall-clock ms when the alert was produced
    pub timestamp_ms: u64,
    /// Chart deep link for the symbol
    pub deep_link: String,
}

/// Per-symbol query result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockData {
    pub symbol: String,
    pub current_price: f64,
    pub change_percent: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub volume: u64,
    pub last_update_ms: u64,
    pub in_threshold: bool,
}

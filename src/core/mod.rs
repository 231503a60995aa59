//! Core types for the screener
//!
//! This module contains the fundamental types used throughout the system:
//! - PricePoint: one price observation (price, event timestamp, volume)
//! - Trade / Quote: incoming feed events
//! - AlertSnapshot: last reported alert state for a symbol
//! - StockData: per-symbol query result

pub mod types;

pub use types::{now_ms, AlertSnapshot, PricePoint, Quote, StockData, Trade};

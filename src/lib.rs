//! Real-time rolling-window market screener core.
//!
//! Ingests a high-rate feed of per-symbol trades and quotes, keeps a bounded
//! rolling window of price points per symbol, and tracks the set of symbols
//! whose in-window percentage gain sits inside a configured alert band.

pub mod core;
pub mod hot_path;
pub mod infrastructure;

// Re-export commonly used types
pub use hot_path::{Analyzer, Reaper};
pub use infrastructure::config::{ApiConfig, Config, LinkConfig, MonitorConfig};

use thiserror::Error;

/// Main error type for the screener
#[derive(Error, Debug)]
pub enum TickError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API server error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TickError>;

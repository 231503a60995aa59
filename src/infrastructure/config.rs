//! Configuration management
//!
//! Loads configuration from config.toml at startup. All values are
//! configurable to avoid hardcoded constants; a missing file yields the
//! defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Screener configuration
///
/// Loaded from config.toml at startup (path overridable via `CONFIG_PATH`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Monitor tuning
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// API server settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Deep-link formatting
    #[serde(default)]
    pub links: LinkConfig,
}

/// Rolling-window monitor tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Ring buffer capacity per symbol (price points)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Lower edge of the alert band (percent)
    #[serde(default = "default_threshold_min")]
    pub threshold_min: f64,

    /// Upper edge of the alert band (percent)
    #[serde(default = "default_threshold_max")]
    pub threshold_max: f64,

    /// Registry admission bound
    #[serde(default = "default_max_stocks")]
    pub max_stocks: usize,

    /// Reaper tick interval (ms)
    #[serde(default = "default_reaper_interval_ms")]
    pub reaper_interval_ms: u64,

    /// Wall-clock idle duration before a symbol is reaped (ms)
    #[serde(default = "default_inactivity_horizon_ms")]
    pub inactivity_horizon_ms: u64,

    /// Minimum in-window points before analysis runs
    #[serde(default = "default_min_points_for_analysis")]
    pub min_points_for_analysis: usize,

    /// Event-time window for the rolling reduction (ms)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Minimum change-percent move required to re-emit an alert
    #[serde(default = "default_hysteresis_delta_percent")]
    pub hysteresis_delta_percent: f64,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Port for the HTTP query API
    #[serde(default = "default_api_port")]
    pub port: u16,
}

/// Deep-link formatting configuration
///
/// Links have the shape `https://{host}/quote/{slug}-{symbol_lower}`, with
/// the exchange slug looked up in `exchanges` and falling back to
/// `default_slug`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkConfig {
    #[serde(default = "default_link_host")]
    pub host: String,

    /// Slug used for exchanges missing from the table
    #[serde(default = "default_link_slug")]
    pub default_slug: String,

    /// Exchange name to URL slug
    #[serde(default = "default_exchange_slugs")]
    pub exchanges: HashMap<String, String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            threshold_min: default_threshold_min(),
            threshold_max: default_threshold_max(),
            max_stocks: default_max_stocks(),
            reaper_interval_ms: default_reaper_interval_ms(),
            inactivity_horizon_ms: default_inactivity_horizon_ms(),
            min_points_for_analysis: default_min_points_for_analysis(),
            window_ms: default_window_ms(),
            hysteresis_delta_percent: default_hysteresis_delta_percent(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: default_link_host(),
            default_slug: default_link_slug(),
            exchanges: default_exchange_slugs(),
        }
    }
}

fn default_buffer_size() -> usize {
    120 // 2 minutes at 1-second cadence
}

fn default_threshold_min() -> f64 {
    9.0
}

fn default_threshold_max() -> f64 {
    13.0
}

fn default_max_stocks() -> usize {
    10_000
}

fn default_reaper_interval_ms() -> u64 {
    60_000
}

fn default_inactivity_horizon_ms() -> u64 {
    3_600_000 // 1 hour
}

fn default_min_points_for_analysis() -> usize {
    5
}

fn default_window_ms() -> u64 {
    120_000 // 2 minutes
}

fn default_hysteresis_delta_percent() -> f64 {
    0.1
}

fn default_api_port() -> u16 {
    8080
}

fn default_link_host() -> String {
    "www.webull.com".to_string()
}

fn default_link_slug() -> String {
    "nasdaq".to_string()
}

fn default_exchange_slugs() -> HashMap<String, String> {
    HashMap::from([
        ("NASDAQ".to_string(), "nasdaq".to_string()),
        ("NYSE".to_string(), "nyse".to_string()),
        ("AMEX".to_string(), "amex".to_string()),
        ("ARCA".to_string(), "arca".to_string()),
    ])
}

impl Config {
    /// Load configuration from the path in `CONFIG_PATH`, falling back to
    /// `config.toml` in the working directory
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".into());
        Self::load_from(&path)
    }

    /// Load configuration from a specific file
    ///
    /// An absent file is not an error (defaults apply); an unreadable or
    /// invalid one is.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_string(),
                    source,
                })
            }
        };

        toml::from_str(&contents).map_err(|e| ConfigError::Invalid {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

impl LinkConfig {
    /// Deep link for a symbol on an exchange
    pub fn quote_url(&self, symbol: &str, exchange: &str) -> String {
        let slug = self
            .exchanges
            .get(exchange)
            .map(String::as_str)
            .unwrap_or(&self.default_slug);
        format!(
            "https://{}/quote/{}-{}",
            self.host,
            slug,
            symbol.to_lowercase()
        )
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config at {path}: {message}")]
    Invalid { path: String, message: String },
}

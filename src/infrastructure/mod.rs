//! Infrastructure - cold path only
//!
//! This module contains non-latency-critical code:
//! - Ring buffer storage used by the per-symbol windows
//! - Configuration management
//! - Logging and metrics
//! - The HTTP query API

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod ring_buffer;

pub use metrics::{MetricsCollector, Stats};
pub use ring_buffer::RingBuffer;

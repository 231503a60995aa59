//! Centralized file-based logging
//!
//! Writes logs to files in logs/ directory:
//! - logs/main - all application logs
//! - logs/error - WARN and above only
//! A console layer mirrors everything for development.

use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize file + console logging
///
/// Returns WorkerGuards which must be kept alive for the duration of the
/// program.
pub fn init_logging() -> Vec<WorkerGuard> {
    let logs_dir = Path::new("logs");
    if !logs_dir.exists() {
        fs::create_dir_all(logs_dir).expect("Failed to create logs directory");
    }

    let mut guards = Vec::new();

    let (main_appender, main_guard) = create_appender("logs/main", "main");
    guards.push(main_guard);

    let (error_appender, error_guard) = create_appender("logs/error", "error");
    guards.push(error_guard);

    let main_layer = tracing_subscriber::fmt::layer()
        .with_writer(main_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .json();

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(main_layer)
        .with(error_layer)
        .with(console_layer)
        .init();

    tracing::info!("Logging initialized, files under logs/");

    guards
}

/// Create a rolling daily file appender
fn create_appender(dir: &str, name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, name);
    tracing_appender::non_blocking(appender)
}

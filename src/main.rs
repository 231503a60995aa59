//! Market screener service
//!
//! Wires the rolling-window analyzer to its cold path: logging, config,
//! the idle-symbol reaper, an alert-logging callback, and the HTTP query
//! API. The upstream feed connects through `Analyzer::process_trade` /
//! `process_quote`; this binary owns everything downstream of that call.

use std::sync::Arc;
use tickwatch::hot_path::{Analyzer, Reaper};
use tickwatch::infrastructure::{api, logging};
use tickwatch::{Config, Result, TickError};

#[tokio::main]
async fn main() -> Result<()> {
    let _guards = logging::init_logging();

    let config = Config::load().map_err(|e| TickError::Config(e.to_string()))?;
    tracing::info!(
        buffer_size = config.monitor.buffer_size,
        threshold_min = config.monitor.threshold_min,
        threshold_max = config.monitor.threshold_max,
        max_stocks = config.monitor.max_stocks,
        "starting screener"
    );

    let api_port = config.api.port;
    let analyzer = Arc::new(Analyzer::new(config));

    analyzer.set_alert_callback(|alert| {
        tracing::info!(
            symbol = %alert.symbol,
            change_percent = alert.change_percent,
            price = alert.current_price,
            link = %alert.deep_link,
            "ALERT"
        );
    });

    let reaper = Reaper::spawn(Arc::clone(&analyzer));

    let server = tokio::spawn(api::start_server(Arc::clone(&analyzer), api_port));

    tokio::signal::ctrl_c()
        .await
        .map_err(TickError::Io)?;
    tracing::info!("shutting down");

    analyzer.shutdown();
    reaper.stop();
    server.abort();

    tracing::info!("shutdown complete");
    Ok(())
}

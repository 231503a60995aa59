//! HTTP query API (cold path)
//!
//! Read-only endpoints polled by downstream clients: the active alert set,
//! per-symbol data, and ingest stats. All state access goes through the
//! analyzer's snapshot methods; no lock is held across an await.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::hot_path::Analyzer;
use crate::TickError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

/// Start the API server
pub async fn start_server(analyzer: Arc<Analyzer>, port: u16) -> Result<(), TickError> {
    let state = AppState { analyzer };

    let app = Router::new()
        .route("/api/screener/active", get(get_active_symbols))
        .route("/api/stocks/:symbol", get(get_stock))
        .route("/api/stats", get(get_stats))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(TickError::Io)?;

    axum::serve(listener, app)
        .await
        .map_err(|e| TickError::Api(e.to_string()))?;

    Ok(())
}

/// Handler for /api/screener/active
///
/// Symbols currently inside the alert band, best movers first.
async fn get_active_symbols(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.analyzer.active_symbols())
}

/// Handler for /api/stocks/:symbol
async fn get_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> impl IntoResponse {
    match state.analyzer.symbol_data(&symbol) {
        Some(data) => Json(data).into_response(),
        None => (StatusCode::NOT_FOUND, "symbol not tracked").into_response(),
    }
}

/// Handler for /api/stats
async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.analyzer.stats())
}

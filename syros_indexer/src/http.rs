//! Process HTTP surface (§6): `/ping`, `/status`, `/config`, `/metrics`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use syros_core::metrics::Metrics;

use crate::config::IndexerConfig;

#[derive(Clone)]
struct AppState {
    config: Arc<IndexerConfig>,
    metrics: Arc<Metrics>,
}

pub fn router(config: Arc<IndexerConfig>, metrics: Arc<Metrics>) -> Router {
    let state = AppState { config, metrics };
    Router::new()
        .route("/ping", get(ping))
        .route("/status", get(status))
        .route("/config", get(config_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn ping() -> &'static str {
    "pong"
}

async fn status() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn config_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json((*state.config).clone())
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics render failed: {}", e)),
    }
}

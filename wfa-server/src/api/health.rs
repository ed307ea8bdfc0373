//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use wfa_common::api::HealthResponse;

use crate::AppState;

/// GET /health
///
/// Reports module identity and how many analyses are held in memory.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "wfa-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        analyses: state.store.len().await,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

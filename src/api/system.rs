//! System endpoints: health check and registered message types.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    version: &'static str,
}

/// Registered message types response.
#[derive(Debug, Serialize)]
struct TypesResponse {
    types: Vec<String>,
}

/// `GET /health` — Service health status.
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// `GET /types` — Message types the dispatcher can route, sorted.
pub async fn types_handler(State(state): State<AppState>) -> impl IntoResponse {
    let types = state
        .dispatcher
        .registry()
        .list()
        .into_iter()
        .map(str::to_string)
        .collect();
    (StatusCode::OK, Json(TypesResponse { types }))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/types", get(types_handler))
}

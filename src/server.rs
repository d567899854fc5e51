//! Startup wiring: registry construction and router composition.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::GatewayConfig;
use crate::dispatch::HandlerRegistry;
use crate::error::GatewayError;
use crate::handlers::register_builtin;
use crate::ws::handler::ws_handler;

/// Builds the registry with every built-in handler.
///
/// # Errors
///
/// Returns [`GatewayError::DuplicateType`] if two handlers claim the same
/// message type.
pub fn build_registry() -> Result<HandlerRegistry, GatewayError> {
    let mut registry = HandlerRegistry::new();
    register_builtin(&mut registry)?;
    Ok(registry)
}

/// Builds application state from configuration and a finished registry.
///
/// The registry is frozen here: no handler can be added once it is shared.
#[must_use]
pub fn build_state(config: &GatewayConfig, registry: HandlerRegistry) -> AppState {
    AppState::new(
        Arc::new(registry),
        &config.default_topic,
        config.outbound_buffer,
    )
}

/// Composes the full HTTP router: the WebSocket endpoint on `/` and `/ws`
/// plus diagnostics routes.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the gateway on an already-bound listener until the server stops.
///
/// # Errors
///
/// Returns any I/O error from the underlying accept loop.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, build_app(state)).await
}

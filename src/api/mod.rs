//! HTTP diagnostics routes.
//!
//! Mounted at the root level next to the `/ws` endpoint.

pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Builds the router with all HTTP diagnostics endpoints.
pub fn build_router() -> Router<AppState> {
    system::routes()
}

//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::domain::ConnectionIdentity;

/// `GET /` and `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// Each upgraded connection gets a fresh [`ConnectionIdentity`] in the
/// configured default topic.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let identity = ConnectionIdentity::new(&*state.default_topic);
    let AppState {
        dispatcher,
        outbound_buffer,
        ..
    } = state;

    ws.on_upgrade(move |socket| run_connection(socket, dispatcher, identity, outbound_buffer))
}

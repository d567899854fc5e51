//! Per-frame decode, lookup, invoke and respond pipeline.
//!
//! [`Dispatcher::dispatch`] turns one raw inbound frame into zero or more
//! outbound envelopes. It never fails and never closes the connection:
//! every failure path ends in an `error` envelope on the same connection.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;

use super::HandlerRegistry;
use crate::domain::{Connection, Envelope};
use crate::error::GatewayError;

/// Routes inbound frames to handlers in a shared [`HandlerRegistry`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
}

impl Dispatcher {
    /// Creates a dispatcher over a frozen registry.
    #[must_use]
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry this dispatcher resolves handlers from.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Dispatches one raw frame received on `conn`.
    ///
    /// Frame bytes must be UTF-8 JSON of the form
    /// `{"type": "<string>", "payload": <any>}`. Malformed frames, unknown
    /// types, validation failures and handler faults are all answered with
    /// an `error` envelope.
    pub async fn dispatch(&self, conn: &Connection, frame: &[u8]) {
        let Err(err) = self.route(conn, frame).await else {
            return;
        };

        let envelope = err.to_envelope();
        if let Err(send_err) = conn.send(&envelope).await {
            tracing::debug!(
                conn_id = %conn.id(),
                error = %send_err,
                "dropping error envelope for closed connection"
            );
        }
    }

    /// Dispatches one text frame received on `conn`.
    pub async fn dispatch_text(&self, conn: &Connection, text: &str) {
        self.dispatch(conn, text.as_bytes()).await;
    }

    async fn route(&self, conn: &Connection, frame: &[u8]) -> Result<(), GatewayError> {
        let text = std::str::from_utf8(frame).map_err(|e| {
            tracing::debug!(conn_id = %conn.id(), error = %e, "frame is not valid UTF-8");
            GatewayError::MalformedFrame
        })?;
        let Envelope { msg_type, payload } = Envelope::parse(text)?;

        let handler = self.registry.resolve(&msg_type).inspect_err(|_| {
            tracing::debug!(conn_id = %conn.id(), %msg_type, "unknown message type");
        })?;

        let handler_conn = conn.clone();
        let outcome = AssertUnwindSafe(async move { handler.handle(handler_conn, payload).await })
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(result) => result,
            Err(panic) => Err(GatewayError::Internal(panic_message(panic.as_ref()))),
        };

        match &result {
            Err(err) if err.is_client_error() => {
                tracing::debug!(conn_id = %conn.id(), %msg_type, error = ?err, "handler rejected payload");
            }
            Err(GatewayError::ConnectionClosed) => {
                tracing::debug!(conn_id = %conn.id(), %msg_type, "connection closed during handler");
            }
            Err(err) => {
                tracing::error!(conn_id = %conn.id(), %msg_type, error = %err, "handler failed");
            }
            Ok(()) => {}
        }
        result
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("handler panicked: {s}")
    } else {
        "handler panicked".to_string()
    }
}

//! Built-in message handlers: `send_message` and `test`.

use serde::Serialize;
use serde_json::Value;

use super::validation::{FieldErrors, required_non_empty_str};
use crate::domain::{Connection, Envelope};
use crate::error::GatewayError;

/// Inbound type for chat messages.
pub const SEND_MESSAGE: &str = "send_message";
/// Outbound type acknowledging a `send_message`.
pub const MESSAGE_CONFIRMATION: &str = "message_confirmation";
/// Inbound connectivity probe.
pub const TEST: &str = "test";
/// Outbound reply to a `test` probe.
pub const TEST_RESPONSE: &str = "test_response";

#[derive(Debug, Serialize)]
struct MessageConfirmation {
    status: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct TestResponse {
    message: &'static str,
}

/// Handles `send_message`: payload `{content: non-empty string}`.
///
/// Replies with `message_confirmation` echoing the content.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] when `content` is missing, not a
/// string, or empty, and [`GatewayError::ConnectionClosed`] if the reply
/// cannot be queued.
pub async fn send_message(conn: Connection, payload: Value) -> Result<(), GatewayError> {
    let mut errors = FieldErrors::new();
    let content = required_non_empty_str(&payload, "content", &mut errors);
    let Some(content) = content else {
        return errors.into_result();
    };

    tracing::info!(conn_id = %conn.id(), topic = %conn.identity().topic, content, "received message");

    let reply = MessageConfirmation {
        status: "ok",
        content: format!("Message \"{content}\" received."),
    };
    conn.send(&Envelope::new(MESSAGE_CONFIRMATION, serde_json::to_value(reply)?))
        .await
}

/// Handles `test`: ignores the payload and replies with `test_response`.
///
/// # Errors
///
/// Returns [`GatewayError::ConnectionClosed`] if the reply cannot be
/// queued.
pub async fn test_probe(conn: Connection, _payload: Value) -> Result<(), GatewayError> {
    let reply = TestResponse {
        message: "Test successful!",
    };
    conn.send(&Envelope::new(TEST_RESPONSE, serde_json::to_value(reply)?))
        .await
}

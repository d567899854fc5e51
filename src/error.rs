//! Gateway error types with error-envelope mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Every
//! variant that can arise while handling an inbound frame maps to a
//! structured `error` envelope sent back on the originating connection.

use serde::Serialize;

use crate::domain::Envelope;
use crate::handlers::FieldErrors;

/// Message type used for every error envelope.
pub const ERROR_TYPE: &str = "error";

/// Client-facing message for frames that are not a valid envelope.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON format";

/// Client-facing message for payload validation failures.
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

/// Client-facing message for handler faults. Never carries internal detail.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Payload of an `error` envelope.
///
/// All error envelopes follow this shape:
/// ```json
/// {
///   "type": "error",
///   "payload": {
///     "message": "Validation failed",
///     "errors": { "content": ["String must contain at least 1 character(s)"] }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    /// Human-readable error message.
    pub message: String,
    /// Per-field validation errors, present only for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// Server-side error enum.
///
/// # Client mapping
///
/// | Variant          | Envelope message                  |
/// |------------------|-----------------------------------|
/// | `MalformedFrame` | `Invalid JSON format`             |
/// | `UnknownType`    | `Unknown message type: <type>`    |
/// | `Validation`     | `Validation failed` + `errors`    |
/// | everything else  | `An unexpected error occurred`    |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Frame was not UTF-8 JSON, or lacked a string `type` field.
    #[error("malformed frame")]
    MalformedFrame,

    /// No handler is registered for the given message type.
    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// Handler-level payload validation failed.
    #[error("payload validation failed")]
    Validation(FieldErrors),

    /// A handler for this message type is already registered.
    #[error("handler already registered for message type: {0}")]
    DuplicateType(String),

    /// Failure inside a handler that is not a validation failure.
    #[error("internal error: {0}")]
    Internal(String),

    /// JSON encoding failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The connection's outbound channel is gone.
    #[error("connection closed")]
    ConnectionClosed,
}

impl GatewayError {
    /// Returns `true` if this error is reported to the client verbatim
    /// rather than as a generic unexpected-error envelope.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedFrame | Self::UnknownType(_) | Self::Validation(_)
        )
    }

    /// Returns the client-facing error payload for this variant.
    #[must_use]
    pub fn error_payload(&self) -> ErrorPayload {
        match self {
            Self::MalformedFrame => ErrorPayload {
                message: INVALID_JSON_MESSAGE.to_string(),
                errors: None,
            },
            Self::UnknownType(msg_type) => ErrorPayload {
                message: format!("Unknown message type: {msg_type}"),
                errors: None,
            },
            Self::Validation(errors) => ErrorPayload {
                message: VALIDATION_FAILED_MESSAGE.to_string(),
                errors: Some(errors.clone()),
            },
            Self::DuplicateType(_)
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::ConnectionClosed => ErrorPayload {
                message: UNEXPECTED_ERROR_MESSAGE.to_string(),
                errors: None,
            },
        }
    }

    /// Builds the `error` envelope sent to the client for this variant.
    #[must_use]
    pub fn to_envelope(&self) -> Envelope {
        let payload = serde_json::to_value(self.error_payload()).unwrap_or_else(|_| {
            serde_json::json!({ "message": UNEXPECTED_ERROR_MESSAGE })
        });
        Envelope::new(ERROR_TYPE, payload)
    }
}

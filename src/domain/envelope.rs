//! The `{type, payload}` wire envelope shared by requests and responses.

use serde::Serialize;
use serde_json::Value;

use crate::error::GatewayError;

/// Typed JSON envelope carried in every text frame, in both directions.
///
/// `msg_type` is the dispatch key. `payload` is opaque to the dispatcher
/// and validated only by the handler it is routed to. An absent inbound
/// `payload` decodes as [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Handler-specific payload.
    pub payload: Value,
}

impl Envelope {
    /// Creates an envelope with the given type and payload.
    #[must_use]
    pub fn new(msg_type: impl Into<String>, payload: Value) -> Self {
        Self {
            msg_type: msg_type.into(),
            payload,
        }
    }

    /// Parses a text frame into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MalformedFrame`] if the text is not JSON,
    /// is not an object, or has no string `type` field.
    pub fn parse(text: &str) -> Result<Self, GatewayError> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            tracing::debug!(error = %e, "frame is not valid JSON");
            GatewayError::MalformedFrame
        })?;
        Self::from_value(value)
    }

    /// Builds an envelope from an already-decoded JSON value.
    ///
    /// Only objects are envelopes; arrays and scalars are rejected even when
    /// their elements would line up with `type` and `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MalformedFrame`] if `value` is not an object
    /// or its `type` field is missing or not a string.
    pub fn from_value(value: Value) -> Result<Self, GatewayError> {
        let Value::Object(mut fields) = value else {
            tracing::debug!("envelope is not a JSON object");
            return Err(GatewayError::MalformedFrame);
        };
        let Some(Value::String(msg_type)) = fields.remove("type") else {
            tracing::debug!("envelope has no string type field");
            return Err(GatewayError::MalformedFrame);
        };
        let payload = fields.remove("payload").unwrap_or(Value::Null);
        Ok(Self { msg_type, payload })
    }

    /// Serializes the envelope as a JSON text frame.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if the payload cannot be
    /// encoded.
    pub fn to_json(&self) -> Result<String, GatewayError> {
        Ok(serde_json::to_string(self)?)
    }
}

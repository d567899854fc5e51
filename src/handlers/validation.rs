//! Payload validation helpers shared by handlers.
//!
//! Handlers collect problems into a [`FieldErrors`] map and turn it into
//! [`GatewayError::Validation`] with [`FieldErrors::into_result`].

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::GatewayError;

/// Ordered mapping from field name to its human-readable error messages.
///
/// Serializes as a plain JSON object: `{"content": ["Required"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message` to the errors recorded for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Returns the messages recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns `true` if no errors have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the map into a result: `Ok(())` when empty.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] carrying `self` if any field
    /// error was recorded.
    pub fn into_result(self) -> Result<(), GatewayError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::Validation(self))
        }
    }
}

/// Reads `field` from `payload` as a non-empty string.
///
/// Records an error on `errors` and returns `None` when the payload is not
/// an object, the field is missing, is not a string, or is empty.
pub fn required_non_empty_str<'a>(
    payload: &'a Value,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    match payload.get(field) {
        None => {
            errors.add(field, "Required");
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.add(field, "String must contain at least 1 character(s)");
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            errors.add(
                field,
                format!("Expected string, received {}", json_kind(other)),
            );
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

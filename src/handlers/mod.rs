//! Built-in message handlers and the payload validation they share.

pub mod message;
pub mod validation;

pub use validation::FieldErrors;

use crate::dispatch::HandlerRegistry;
use crate::error::GatewayError;

/// Registers every built-in handler on `registry`.
///
/// # Errors
///
/// Returns [`GatewayError::DuplicateType`] if any built-in type is
/// already registered.
pub fn register_builtin(registry: &mut HandlerRegistry) -> Result<(), GatewayError> {
    registry.register(message::SEND_MESSAGE, message::send_message)?;
    registry.register(message::TEST, message::test_probe)?;
    Ok(())
}

//! Write-once table from message type to handler.
//!
//! [`HandlerRegistry`] is populated with explicit [`HandlerRegistry::register`]
//! calls during startup and then frozen behind an `Arc`. Registration needs
//! `&mut self`, so once the registry is shared with live connections it can
//! no longer change and lookups need no synchronization.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::domain::Connection;
use crate::error::GatewayError;

/// Business logic bound to one message type.
///
/// A handler receives the connection it was invoked on and the raw
/// `payload` value of the inbound envelope ([`Value::Null`] when absent).
/// It validates the payload itself and writes zero or more envelopes back
/// through [`Connection::send`].
///
/// Any `Fn(Connection, Value) -> impl Future<Output = Result<(), GatewayError>>`
/// is a handler, so plain `async fn`s can be registered directly.
pub trait MessageHandler: Send + Sync + 'static {
    /// Handles one inbound payload.
    fn handle(&self, conn: Connection, payload: Value) -> BoxFuture<'static, Result<(), GatewayError>>;
}

impl<F, Fut> MessageHandler for F
where
    F: Fn(Connection, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), GatewayError>> + Send + 'static,
{
    fn handle(&self, conn: Connection, payload: Value) -> BoxFuture<'static, Result<(), GatewayError>> {
        (self)(conn, payload).boxed()
    }
}

/// Process-wide mapping from message type to [`MessageHandler`].
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `msg_type`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DuplicateType`] if a handler is already
    /// registered for `msg_type`. The existing binding is left untouched.
    pub fn register<H>(&mut self, msg_type: impl Into<String>, handler: H) -> Result<(), GatewayError>
    where
        H: MessageHandler,
    {
        match self.handlers.entry(msg_type.into()) {
            Entry::Occupied(entry) => Err(GatewayError::DuplicateType(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::debug!(msg_type = %entry.key(), "registered message handler");
                entry.insert(Arc::new(handler));
                Ok(())
            }
        }
    }

    /// Looks up the handler bound to `msg_type`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownType`] carrying the literal type if
    /// nothing is registered for it.
    pub fn resolve(&self, msg_type: &str) -> Result<Arc<dyn MessageHandler>, GatewayError> {
        self.handlers
            .get(msg_type)
            .map(Arc::clone)
            .ok_or_else(|| GatewayError::UnknownType(msg_type.to_string()))
    }

    /// Returns the registered message types in sorted order.
    #[must_use]
    pub fn list(&self) -> BTreeSet<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("types", &self.list())
            .finish()
    }
}

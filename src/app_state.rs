//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::dispatch::{Dispatcher, HandlerRegistry};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Dispatcher shared by every WebSocket connection.
    pub dispatcher: Dispatcher,
    /// Topic assigned to new connections.
    pub default_topic: Arc<str>,
    /// Capacity of each connection's outbound queue.
    pub outbound_buffer: usize,
}

impl AppState {
    /// Builds state around a frozen handler registry.
    #[must_use]
    pub fn new(registry: Arc<HandlerRegistry>, default_topic: &str, outbound_buffer: usize) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry),
            default_topic: Arc::from(default_topic),
            outbound_buffer,
        }
    }
}

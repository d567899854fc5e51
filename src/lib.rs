//! # courier-gateway
//!
//! Real-time WebSocket message server built around typed JSON envelope
//! dispatch.
//!
//! Clients keep a WebSocket open and send `{"type": ..., "payload": ...}`
//! envelopes. Each envelope is routed by its `type` to a handler registered
//! at startup; handlers reply with envelopes of the same shape. Every
//! failure (malformed frame, unknown type, invalid payload, handler fault)
//! is answered with an `error` envelope and never closes the connection.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)          Diagnostics (api/)
//!     │
//!     ├── Dispatcher (dispatch/)
//!     │
//!     ├── HandlerRegistry (dispatch/)
//!     │
//!     └── Built-in Handlers (handlers/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod server;
pub mod ws;

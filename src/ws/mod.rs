//! WebSocket layer: connection upgrade and per-connection read/write loop.
//!
//! The WebSocket endpoint at `/` (also `/ws`) carries JSON envelopes in both
//! directions. Every inbound text or binary frame is handed to the
//! [`Dispatcher`](crate::dispatch::Dispatcher).

pub mod connection;
pub mod handler;

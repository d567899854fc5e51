//! Domain layer: wire envelope and connection identity.
//!
//! These types are shared by the dispatcher, the built-in handlers and the
//! WebSocket transport.

pub mod connection;
pub mod connection_id;
pub mod envelope;

pub use connection::{Connection, ConnectionIdentity};
pub use connection_id::ConnectionId;
pub use envelope::Envelope;

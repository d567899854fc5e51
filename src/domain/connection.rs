//! Per-connection identity and outbound send handle.
//!
//! A [`Connection`] is what handlers receive: the immutable
//! [`ConnectionIdentity`] assigned at upgrade time plus a bounded channel
//! into the socket's writer task. Cloning is cheap; every clone writes to
//! the same peer.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::{ConnectionId, Envelope};
use crate::error::GatewayError;

/// Metadata assigned once when a connection opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionIdentity {
    /// Unique connection identifier.
    pub id: ConnectionId,
    /// Topic the connection joined. Fixed for the connection's lifetime.
    pub topic: String,
}

impl ConnectionIdentity {
    /// Creates a fresh identity with a random id in the given topic.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            id: ConnectionId::new(),
            topic: topic.into(),
        }
    }
}

/// Handle to a live connection's identity and outbound frame queue.
#[derive(Debug, Clone)]
pub struct Connection {
    identity: Arc<ConnectionIdentity>,
    tx: mpsc::Sender<String>,
}

impl Connection {
    /// Creates a connection handle that queues frames on `tx`.
    #[must_use]
    pub fn new(identity: ConnectionIdentity, tx: mpsc::Sender<String>) -> Self {
        Self {
            identity: Arc::new(identity),
            tx,
        }
    }

    /// Creates a connection handle along with the receiving end of a new
    /// outbound queue of the given capacity (clamped to at least 1).
    #[must_use]
    pub fn channel(identity: ConnectionIdentity, capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(identity, tx), rx)
    }

    /// Returns the connection's identity.
    #[must_use]
    pub fn identity(&self) -> &ConnectionIdentity {
        &self.identity
    }

    /// Returns the connection's id.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.identity.id
    }

    /// Serializes `envelope` and queues it for the peer.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if encoding fails, or
    /// [`GatewayError::ConnectionClosed`] if the writer has shut down.
    pub async fn send(&self, envelope: &Envelope) -> Result<(), GatewayError> {
        self.send_raw(envelope.to_json()?).await
    }

    /// Queues an already-encoded text frame for the peer.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConnectionClosed`] if the writer has shut
    /// down.
    pub async fn send_raw(&self, frame: String) -> Result<(), GatewayError> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| GatewayError::ConnectionClosed)
    }

    /// Returns `true` once the writer side has gone away.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn send_queues_serialized_envelope() {
        let (conn, mut rx) = Connection::channel(ConnectionIdentity::new("general"), 4);
        let env = Envelope::new("test_response", json!({ "message": "ok" }));
        assert!(conn.send(&env).await.is_ok());

        let Some(frame) = rx.recv().await else {
            panic!("expected a frame");
        };
        assert_eq!(frame, r#"{"type":"test_response","payload":{"message":"ok"}}"#);
    }

    #[tokio::test]
    async fn send_after_receiver_dropped_fails() {
        let (conn, rx) = Connection::channel(ConnectionIdentity::new("general"), 1);
        drop(rx);
        assert!(conn.is_closed());
        let result = conn.send_raw("{}".to_string()).await;
        assert!(matches!(result, Err(GatewayError::ConnectionClosed)));
    }

    #[test]
    fn clones_share_identity() {
        let (conn, _rx) = Connection::channel(ConnectionIdentity::new("lobby"), 1);
        let other = conn.clone();
        assert_eq!(conn.id(), other.id());
        assert_eq!(other.identity().topic, "lobby");
    }
}

//! WebSocket connection read/write loop.
//!
//! Handles the read/write loop for a single WebSocket connection. Reads are
//! dispatched one at a time, so a frame is fully handled before the next one
//! from the same peer is read. Writes go through a bounded queue drained by
//! a dedicated writer task.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use crate::dispatch::Dispatcher;
use crate::domain::{Connection, ConnectionIdentity};

/// How long queued replies may keep flushing after the read side ends.
///
/// A handler that moved a [`Connection`] clone into a spawned task keeps
/// the outbound queue open; the writer is aborted once this elapses.
pub const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Text and binary frames are dispatched in arrival order.
/// - Frames queued on the [`Connection`] are written by a writer task.
/// - A close frame, a read error, end of stream or a dead writer ends the
///   loop.
pub async fn run_connection(
    socket: WebSocket,
    dispatcher: Dispatcher,
    identity: ConnectionIdentity,
    outbound_buffer: usize,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (conn, mut out_rx) = Connection::channel(identity, outbound_buffer);
    let conn_id = conn.id();

    tracing::info!(%conn_id, topic = %conn.identity().topic, "connection opened");

    let mut writer = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if ws_tx.send(Message::text(frame)).await.is_err() {
                break;
            }
        }
        // Peer may already be gone.
        let _ = ws_tx.close().await;
    });

    let mut close_code = None;
    let mut close_reason = None;

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => dispatcher.dispatch(&conn, text.as_str().as_bytes()).await,
            Ok(Message::Binary(bytes)) => dispatcher.dispatch(&conn, &bytes).await,
            Ok(Message::Close(frame)) => {
                if let Some(frame) = frame {
                    close_code = Some(frame.code);
                    close_reason = Some(frame.reason.as_str().to_string());
                }
                break;
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "ws read error");
                break;
            }
        }

        if conn.is_closed() {
            tracing::debug!(%conn_id, "ws writer stopped; ending read loop");
            break;
        }
    }

    drop(conn);
    tracing::info!(%conn_id, code = ?close_code, reason = ?close_reason, "connection closed");

    match tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(%conn_id, error = %e, "ws writer task failed"),
        Err(_) => {
            tracing::debug!(%conn_id, "outbound queue still held after close; aborting writer");
            writer.abort();
        }
    }
}

//! WebSocket connection loop.
//!
//! Registers the socket with the hub, forwards count updates to the client
//! and unregisters on every exit path.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use crate::domain::{ConnectionId, connection_channel};
use crate::service::InterestService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - The current count is pushed by registration, before any broadcast can
///   reach this connection.
/// - Only the latest count is kept; counts that arrive while the socket is
///   busy are coalesced.
/// - Client frames are ignored; close, error or end of stream ends the loop.
pub async fn run_connection(socket: WebSocket, service: Arc<InterestService>) {
    let id = ConnectionId::new();
    let (tx, mut updates) = connection_channel();

    match service.open_connection(id, tx).await {
        Ok(count) => tracing::debug!(connection = %id, count, "ws connection opened"),
        Err(e) => {
            tracing::warn!(connection = %id, error = %e, "ws connection refused");
            return;
        }
    }

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let update = *updates.borrow_and_update();
                let Ok(json) = serde_json::to_string(&update) else {
                    continue;
                };
                if ws_tx.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
        }
    }

    service.close_connection(id).await;
    tracing::debug!(connection = %id, "ws connection closed");
}

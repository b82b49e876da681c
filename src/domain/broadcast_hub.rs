//! Registry of live push connections and count fan-out.
//!
//! [`ConnectionHub`] owns every open `/ws/interest` connection as the
//! sending half of a `watch` channel. The per-socket task writes the latest
//! value to the WebSocket, so a push from the hub never blocks on the
//! network and a slow reader only ever holds one pending count. A failed
//! push means the socket task has already exited; the connection is
//! dropped from the registry on the spot.

use std::future::Future;

use tokio::sync::{Mutex, watch};

use super::{ConnectionId, InterestUpdate};
use crate::error::GatewayError;

/// Sender half of a connection's latest-count slot.
pub type ConnectionSender = watch::Sender<InterestUpdate>;

/// Receiver half of a connection's latest-count slot.
pub type ConnectionReceiver = watch::Receiver<InterestUpdate>;

/// Creates the slot for a new connection. The placeholder value is marked
/// as seen; the first value the receiver observes is the one pushed by
/// [`ConnectionHub::register`].
#[must_use]
pub fn connection_channel() -> (ConnectionSender, ConnectionReceiver) {
    watch::channel(InterestUpdate::new(0))
}

/// Point-in-time reader of the committed interest count.
///
/// Implemented by the SQLite store; tests supply in-memory fakes.
pub trait CountSource {
    /// Returns the number of committed interest events.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] if the count cannot be read.
    fn current_count(&self) -> impl Future<Output = Result<u64, GatewayError>> + Send;
}

/// A registered push connection.
#[derive(Debug)]
pub struct LiveConnection {
    id: ConnectionId,
    sender: ConnectionSender,
}

impl LiveConnection {
    /// Pairs a connection id with its outbound queue.
    #[must_use]
    pub const fn new(id: ConnectionId, sender: ConnectionSender) -> Self {
        Self { id, sender }
    }

    /// Returns the connection id.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    fn push(&self, update: InterestUpdate) -> bool {
        self.sender.send(update).is_ok()
    }
}

#[derive(Debug, Default)]
struct HubState {
    /// Open connections in registration order.
    connections: Vec<LiveConnection>,
    /// Highest count pushed so far. Counts only grow, so a late broadcast
    /// carrying a smaller value is raised to this one.
    last_count: u64,
}

/// Concurrency-safe registry of open push connections.
///
/// # Concurrency
///
/// - `register`, `unregister` and `broadcast` may be called from any task.
/// - All three serialize on one async mutex, held only for non-blocking
///   channel pushes. The store is never read under it.
/// - The hub remembers the highest count it has pushed. A new connection
///   whose store read raced with a broadcast is raised to that value, so
///   every connection observes a non-decreasing sequence and nobody is
///   left on a stale count.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    state: Mutex<HubState>,
}

impl ConnectionHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection and immediately pushes it the current count.
    ///
    /// Returns the count that was sent. If the connection's receiver is
    /// already gone, nothing is registered.
    ///
    /// # Errors
    ///
    /// Propagates the error from `source`; the connection is not
    /// registered in that case.
    pub async fn register<S: CountSource>(
        &self,
        connection: LiveConnection,
        source: &S,
    ) -> Result<u64, GatewayError> {
        let read = source.current_count().await?;

        let mut state = self.state.lock().await;
        let count = read.max(state.last_count);

        if !connection.push(InterestUpdate::new(count)) {
            tracing::debug!(connection_id = %connection.id, "connection closed before registration");
            return Ok(count);
        }

        state.last_count = count;
        tracing::debug!(connection_id = %connection.id, count, "connection registered");
        state.connections.push(connection);
        Ok(count)
    }

    /// Removes a connection. Returns `false` if it was not registered.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let mut state = self.state.lock().await;
        let Some(position) = state.connections.iter().position(|c| c.id == id) else {
            return false;
        };
        state.connections.remove(position);
        tracing::debug!(connection_id = %id, "connection unregistered");
        true
    }

    /// Pushes `count` to every registered connection.
    ///
    /// Connections whose queue is closed are unregistered and skipped;
    /// the fan-out always continues to the rest. Returns the number of
    /// connections that received the update.
    pub async fn broadcast(&self, count: u64) -> usize {
        let mut state = self.state.lock().await;
        let count = count.max(state.last_count);
        state.last_count = count;

        let update = InterestUpdate::new(count);
        let before = state.connections.len();
        state.connections.retain(|connection| {
            let delivered = connection.push(update);
            if !delivered {
                tracing::debug!(connection_id = %connection.id, "dropping closed connection");
            }
            delivered
        });

        let delivered = state.connections.len();
        tracing::debug!(
            count,
            delivered,
            dropped = before - delivered,
            "interest count broadcast"
        );
        delivered
    }

    /// Returns the number of open connections.
    pub async fn len(&self) -> usize {
        self.state.lock().await.connections.len()
    }

    /// Returns `true` if no connection is open.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.connections.is_empty()
    }
}

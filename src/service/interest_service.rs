//! Interest service: records writes, runs the durability hook and fans
//! out the new count.

use std::sync::Arc;

use crate::domain::{ConnectionHub, ConnectionId, ConnectionSender, LiveConnection};
use crate::error::GatewayError;
use crate::persistence::{DurabilityHook, InterestEvent, SqliteStore, StoreSummary, Subscriber};

/// Number of rows shown in the admin "recent" lists.
pub const RECENT_LIMIT: u32 = 10;

/// Aggregates and recent rows for the admin dashboard.
#[derive(Debug, Clone)]
pub struct AdminStats {
    /// Aggregate counters.
    pub summary: StoreSummary,
    /// Latest interest events, newest first.
    pub recent_interest: Vec<InterestEvent>,
    /// Latest subscribers, newest first.
    pub recent_subscribers: Vec<Subscriber>,
}

/// Full dump of both tables for the admin export.
#[derive(Debug, Clone)]
pub struct DataExport {
    /// Aggregate counters.
    pub summary: StoreSummary,
    /// Every interest event, newest first.
    pub interest: Vec<InterestEvent>,
    /// Every subscriber, newest first.
    pub subscribers: Vec<Subscriber>,
}

/// Orchestration layer for interest and subscription writes.
///
/// Every write follows the same sequence: commit to the store → run the
/// durability hook → broadcast (interest only) → return. Hook failures
/// are the hook's business; the write is already committed.
#[derive(Debug, Clone)]
pub struct InterestService {
    store: SqliteStore,
    hub: Arc<ConnectionHub>,
    durability: Arc<dyn DurabilityHook>,
}

impl InterestService {
    /// Creates a new `InterestService`.
    #[must_use]
    pub fn new(
        store: SqliteStore,
        hub: Arc<ConnectionHub>,
        durability: Arc<dyn DurabilityHook>,
    ) -> Self {
        Self {
            store,
            hub,
            durability,
        }
    }

    /// Returns a reference to the inner [`SqliteStore`].
    #[must_use]
    pub const fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Returns a reference to the inner [`ConnectionHub`].
    #[must_use]
    pub const fn hub(&self) -> &Arc<ConnectionHub> {
        &self.hub
    }

    /// Records one interest event for `origin` and pushes the new count
    /// to every live connection.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] if the write fails. Nothing is
    /// broadcast in that case.
    pub async fn record_interest(&self, origin: &str) -> Result<u64, GatewayError> {
        let count = self.store.record_interest(origin).await?;
        self.after_commit().await;

        let delivered = self.hub.broadcast(count).await;
        tracing::info!(origin, count, delivered, "interest recorded");
        Ok(count)
    }

    /// Returns the number of committed interest events.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on database failure.
    pub async fn current_count(&self) -> Result<u64, GatewayError> {
        self.store.interest_count().await
    }

    /// Adds an email subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if `email` is absent or blank,
    /// [`GatewayError::DuplicateEmail`] if it is already subscribed, or
    /// [`GatewayError::Storage`] on database failure.
    pub async fn subscribe(&self, email: Option<&str>) -> Result<(), GatewayError> {
        let Some(email) = email.filter(|e| !e.trim().is_empty()) else {
            return Err(GatewayError::Validation("Email is required".to_string()));
        };

        self.store.add_subscriber(email).await?;
        self.after_commit().await;

        tracing::info!("subscriber added");
        Ok(())
    }

    /// Registers a live connection; it immediately receives the current
    /// count, which is also returned.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] if the count cannot be read. The
    /// connection is not registered in that case.
    pub async fn open_connection(
        &self,
        id: ConnectionId,
        sender: ConnectionSender,
    ) -> Result<u64, GatewayError> {
        self.hub
            .register(LiveConnection::new(id, sender), &self.store)
            .await
    }

    /// Unregisters a live connection. Safe to call more than once.
    pub async fn close_connection(&self, id: ConnectionId) {
        self.hub.unregister(id).await;
    }

    /// Builds the admin dashboard payload.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on database failure.
    pub async fn admin_stats(&self) -> Result<AdminStats, GatewayError> {
        Ok(AdminStats {
            summary: self.store.summary().await?,
            recent_interest: self.store.recent_interest(Some(RECENT_LIMIT)).await?,
            recent_subscribers: self.store.recent_subscribers(Some(RECENT_LIMIT)).await?,
        })
    }

    /// Dumps both tables for the admin export.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on database failure.
    pub async fn export(&self) -> Result<DataExport, GatewayError> {
        Ok(DataExport {
            summary: self.store.summary().await?,
            interest: self.store.recent_interest(None).await?,
            subscribers: self.store.recent_subscribers(None).await?,
        })
    }

    /// Runs the durability hook off the async runtime and waits for it.
    async fn after_commit(&self) {
        let hook = Arc::clone(&self.durability);
        if let Err(e) = tokio::task::spawn_blocking(move || hook.after_commit()).await {
            tracing::error!(error = %e, "durability hook did not complete");
        }
    }
}

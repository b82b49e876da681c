//! Database rows for interest events and subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored row from the `interest_data` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InterestEvent {
    /// Auto-increment row ID.
    pub id: i64,
    /// Caller-supplied identifier, usually the client's network address.
    #[sqlx(rename = "ip_address")]
    pub origin: String,
    /// Server-side creation timestamp.
    #[sqlx(rename = "timestamp")]
    pub recorded_at: DateTime<Utc>,
}

/// A stored row from the `email_subscribers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscriber {
    /// Auto-increment row ID.
    pub id: i64,
    /// Subscriber email, unique across the table.
    pub email: String,
    /// Server-side creation timestamp.
    #[sqlx(rename = "timestamp")]
    pub recorded_at: DateTime<Utc>,
}

/// Aggregate counters shown on the admin views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreSummary {
    /// Total interest events.
    pub total_interest: u64,
    /// Distinct origins among interest events.
    pub unique_visitors: u64,
    /// Total subscribers.
    pub total_subscribers: u64,
}

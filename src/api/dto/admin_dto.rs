//! Admin dashboard and export DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::persistence::{InterestEvent, StoreSummary, Subscriber};
use crate::service::{AdminStats, DataExport};

/// Response body for `GET /admin/stats`.
///
/// Recent rows are `[value, timestamp]` pairs, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminStatsResponse {
    /// Total interest events.
    pub total_interest: u64,
    /// Distinct origins.
    pub unique_visitors: u64,
    /// Total subscribers.
    pub total_subscribers: u64,
    /// Latest `[origin, timestamp]` pairs.
    #[schema(value_type = Vec<Vec<String>>)]
    pub recent_interest: Vec<(String, String)>,
    /// Latest `[email, timestamp]` pairs.
    #[schema(value_type = Vec<Vec<String>>)]
    pub recent_subscribers: Vec<(String, String)>,
}

impl From<AdminStats> for AdminStatsResponse {
    fn from(stats: AdminStats) -> Self {
        Self {
            total_interest: stats.summary.total_interest,
            unique_visitors: stats.summary.unique_visitors,
            total_subscribers: stats.summary.total_subscribers,
            recent_interest: stats
                .recent_interest
                .into_iter()
                .map(|e| (e.origin, e.recorded_at.to_rfc3339()))
                .collect(),
            recent_subscribers: stats
                .recent_subscribers
                .into_iter()
                .map(|s| (s.email, s.recorded_at.to_rfc3339()))
                .collect(),
        }
    }
}

/// Aggregate counters in the export payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct SummaryDto {
    /// Total interest events.
    pub total_interest: u64,
    /// Distinct origins.
    pub unique_visitors: u64,
    /// Total subscribers.
    pub total_subscribers: u64,
}

impl From<StoreSummary> for SummaryDto {
    fn from(s: StoreSummary) -> Self {
        Self {
            total_interest: s.total_interest,
            unique_visitors: s.unique_visitors,
            total_subscribers: s.total_subscribers,
        }
    }
}

/// One exported interest row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InterestRowDto {
    /// Recorded origin.
    pub ip_address: String,
    /// Recording time.
    pub timestamp: DateTime<Utc>,
}

impl From<InterestEvent> for InterestRowDto {
    fn from(e: InterestEvent) -> Self {
        Self {
            ip_address: e.origin,
            timestamp: e.recorded_at,
        }
    }
}

/// One exported subscriber row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailRowDto {
    /// Subscriber email.
    pub email: String,
    /// Subscription time.
    pub timestamp: DateTime<Utc>,
}

impl From<Subscriber> for EmailRowDto {
    fn from(s: Subscriber) -> Self {
        Self {
            email: s.email,
            timestamp: s.recorded_at,
        }
    }
}

/// Response body for `GET /export-data`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExportResponse {
    /// Aggregate counters.
    pub summary: SummaryDto,
    /// Every interest event, newest first.
    pub interest_data: Vec<InterestRowDto>,
    /// Every subscriber, newest first.
    pub email_data: Vec<EmailRowDto>,
}

impl From<DataExport> for ExportResponse {
    fn from(export: DataExport) -> Self {
        Self {
            summary: export.summary.into(),
            interest_data: export.interest.into_iter().map(Into::into).collect(),
            email_data: export.subscribers.into_iter().map(Into::into).collect(),
        }
    }
}

//! Public visitor-facing DTOs: interest, subscription, landing data.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body for `POST /increment-interest`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct InterestCountResponse {
    /// Total number of recorded interest events after this one.
    pub count: u64,
}

/// Request body for `POST /subscribe`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    /// Subscriber email. Required.
    #[serde(default)]
    pub email: Option<String>,
}

/// Response body for a successful `POST /subscribe`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscribeResponse {
    /// Confirmation message.
    pub message: String,
}

impl SubscribeResponse {
    /// The confirmation returned on every successful subscription.
    #[must_use]
    pub fn subscribed() -> Self {
        Self {
            message: "Successfully subscribed!".to_string(),
        }
    }
}

/// Response body for `GET /landing`: the values the landing page renders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LandingResponse {
    /// Product name.
    pub app_name: String,
    /// Product description.
    pub app_description: String,
    /// Contact email.
    pub app_email: String,
    /// Current interest count (0 if the store is unreachable).
    pub interest_count: u64,
}

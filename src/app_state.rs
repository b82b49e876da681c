//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::AppInfo;
use crate::market::MarketDataClient;
use crate::service::InterestService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Interest service for counts, subscriptions and live connections.
    pub interest_service: Arc<InterestService>,
    /// Market data client behind `/sp500-data`.
    pub market: Arc<MarketDataClient>,
    /// Admin shared secret. Empty disables the admin endpoints.
    pub admin_password: Arc<str>,
    /// Branding rendered by the landing page.
    pub app_info: Arc<AppInfo>,
}

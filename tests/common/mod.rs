//! Shared fixtures for the integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use landing_gateway::api::build_router;
use landing_gateway::app_state::AppState;
use landing_gateway::config::{AppInfo, MarketConfig};
use landing_gateway::domain::ConnectionHub;
use landing_gateway::market::MarketDataClient;
use landing_gateway::persistence::{DurabilityHook, FileSnapshotter, SqliteStore};
use landing_gateway::service::InterestService;
use tempfile::TempDir;

/// Admin secret configured in every test state.
pub const ADMIN_PASSWORD: &str = "s3cret";

/// A fully wired application over a throwaway database.
pub struct TestApp {
    pub state: AppState,
    pub snapshotter: Arc<FileSnapshotter>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("app.db");
        let store = SqliteStore::connect(&db, 5).await.unwrap();
        let snapshotter = Arc::new(FileSnapshotter::new(&db, dir.path().join("backups"), 5));

        let service = InterestService::new(
            store,
            Arc::new(ConnectionHub::new()),
            Arc::clone(&snapshotter) as Arc<dyn DurabilityHook>,
        );
        let market = MarketDataClient::new(MarketConfig {
            api_key: None,
            api_secret: None,
            base_url: None,
            max_attempts: 1,
            retry_delay: Duration::from_millis(1),
            request_timeout: Duration::from_secs(1),
        })
        .unwrap();

        let state = AppState {
            interest_service: Arc::new(service),
            market: Arc::new(market),
            admin_password: Arc::from(ADMIN_PASSWORD),
            app_info: Arc::new(AppInfo {
                name: "Test Product".to_string(),
                description: "Testing the landing page".to_string(),
                email: "hello@example.com".to_string(),
            }),
        };

        Self {
            state,
            snapshotter,
            _dir: dir,
        }
    }

    pub fn router(&self) -> Router {
        build_router().with_state(self.state.clone())
    }
}

//! landing-gateway server entry point.
//!
//! Opens the SQLite store, takes the startup backup and serves the REST
//! and WebSocket endpoints until Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use landing_gateway::api;
use landing_gateway::app_state::AppState;
use landing_gateway::config::GatewayConfig;
use landing_gateway::domain::ConnectionHub;
use landing_gateway::market::MarketDataClient;
use landing_gateway::persistence::{DurabilityHook, FileSnapshotter, NoopHook, SqliteStore};
use landing_gateway::service::InterestService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config = GatewayConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    tracing::info!(addr = %config.listen_addr, db = %config.database_path.display(), "starting landing-gateway");

    // Open the store
    let store = SqliteStore::connect(&config.database_path, config.database_max_connections)
        .await
        .context("failed to open database")?;

    // Durability policy
    let durability: Arc<dyn DurabilityHook> = if config.backup_enabled {
        let snapshotter = FileSnapshotter::new(
            &config.database_path,
            &config.backup_dir,
            config.backup_retention,
        );
        if let Err(e) = snapshotter.initialize() {
            tracing::error!(error = %e, "startup backup failed");
        }
        Arc::new(snapshotter)
    } else {
        tracing::info!("database backups disabled");
        Arc::new(NoopHook)
    };

    if config.admin_password.is_empty() {
        tracing::warn!("ADMIN_PASSWORD is not set; admin endpoints will reject every request");
    }

    // Build service layer
    let hub = Arc::new(ConnectionHub::new());
    let interest_service = Arc::new(InterestService::new(store.clone(), hub, durability));
    let market = Arc::new(MarketDataClient::new(config.market.clone())?);

    // Build application state
    let app_state = AppState {
        interest_service,
        market,
        admin_password: Arc::from(config.admin_password.as_str()),
        app_info: Arc::new(config.app.clone()),
    };

    // Build router
    let app = Router::new().merge(api::build_router());

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    store.close().await;
    tracing::info!("server stopped");
    Ok(())
}

/// Installs the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

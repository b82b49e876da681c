//! REST API layer: route handlers, DTOs, extractors and router composition.
//!
//! Routes are mounted at the root to match the paths the landing page
//! and admin scripts already call.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;
use crate::ws::handler::ws_interest_handler;

/// Builds the complete router: REST endpoints plus the `/ws/interest`
/// WebSocket upgrade.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .route("/ws/interest", get(ws_interest_handler))
}

//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws/interest` — Upgrade HTTP connection to WebSocket.
pub async fn ws_interest_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let service = Arc::clone(&state.interest_service);
    ws.on_upgrade(move |socket| run_connection(socket, service))
}

//! REST endpoint handlers organized by audience.

pub mod admin;
pub mod interest;
pub mod market;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all REST routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(interest::routes())
        .merge(admin::routes())
        .merge(market::routes())
        .merge(system::routes())
}

//! Admin endpoints gated by the shared secret.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{AdminStatsResponse, ExportResponse};
use crate::api::extract::AdminCredential;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /admin/stats` — Aggregates plus the ten most recent rows of each
/// table.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] without the admin credential,
/// or [`GatewayError::Storage`] on database failure.
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "Admin",
    summary = "Admin dashboard statistics",
    params(
        ("password" = Option<String>, Query, description = "Admin secret (alternative to a Bearer token)"),
    ),
    responses(
        (status = 200, description = "Dashboard data", body = AdminStatsResponse),
        (status = 401, description = "Missing or wrong credential", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn admin_stats(
    _admin: AdminCredential,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let stats = state.interest_service.admin_stats().await?;
    Ok(Json(AdminStatsResponse::from(stats)))
}

/// `GET /export-data` — Every interest event and subscriber.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] without the admin credential,
/// or [`GatewayError::Storage`] on database failure.
#[utoipa::path(
    get,
    path = "/export-data",
    tag = "Admin",
    summary = "Export all collected data",
    description = "Returns both tables in full, newest first. The admin page turns this into a CSV download.",
    params(
        ("password" = Option<String>, Query, description = "Admin secret (alternative to a Bearer token)"),
    ),
    responses(
        (status = 200, description = "Full export", body = ExportResponse),
        (status = 401, description = "Missing or wrong credential", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn export_data(
    _admin: AdminCredential,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let export = state.interest_service.export().await?;
    Ok(Json(ExportResponse::from(export)))
}

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(admin_stats))
        .route("/export-data", get(export_data))
}

//! Visitor endpoints: interest clicks, email subscription, landing data.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    InterestCountResponse, LandingResponse, SubscribeRequest, SubscribeResponse,
};
use crate::api::extract::ClientOrigin;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /increment-interest` — Record one interest click.
///
/// # Errors
///
/// Returns [`GatewayError::Storage`] if the event cannot be recorded.
#[utoipa::path(
    post,
    path = "/increment-interest",
    tag = "Interest",
    summary = "Register interest",
    description = "Records one interest event for the caller's address and pushes the new count to every live WebSocket.",
    responses(
        (status = 200, description = "Interest recorded", body = InterestCountResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn increment_interest(
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
) -> Result<impl IntoResponse, GatewayError> {
    let count = state.interest_service.record_interest(&origin).await?;
    Ok(Json(InterestCountResponse { count }))
}

/// `POST /subscribe` — Add an email subscriber.
///
/// A body that is not valid JSON is treated like a missing email.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] if the email is missing,
/// [`GatewayError::DuplicateEmail`] if it is already subscribed, or
/// [`GatewayError::Storage`] on database failure.
#[utoipa::path(
    post,
    path = "/subscribe",
    tag = "Interest",
    summary = "Subscribe an email",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscribed", body = SubscribeResponse),
        (status = 400, description = "Missing or duplicate email", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn subscribe(
    State(state): State<AppState>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let request = payload.map(|Json(req)| req).unwrap_or_default();
    state
        .interest_service
        .subscribe(request.email.as_deref())
        .await?;
    Ok(Json(SubscribeResponse::subscribed()))
}

/// `GET /landing` — Values rendered by the landing page.
///
/// Falls back to a zero count when the store is unreachable, so the page
/// always renders.
#[utoipa::path(
    get,
    path = "/landing",
    tag = "Interest",
    summary = "Landing page data",
    responses(
        (status = 200, description = "Branding and current count", body = LandingResponse),
    )
)]
pub async fn landing(State(state): State<AppState>) -> impl IntoResponse {
    let interest_count = match state.interest_service.current_count().await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(error = %e, "landing count unavailable");
            0
        }
    };

    Json(LandingResponse {
        app_name: state.app_info.name.clone(),
        app_description: state.app_info.description.clone(),
        app_email: state.app_info.email.clone(),
        interest_count,
    })
}

/// Visitor routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/increment-interest", post(increment_interest))
        .route("/subscribe", post(subscribe))
        .route("/landing", get(landing))
}

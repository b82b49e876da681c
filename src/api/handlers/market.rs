//! Market chart proxy.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::market::MarketSeries;

/// `GET /sp500-data` — One year of daily `SPY` closes.
///
/// Always succeeds; upstream failures produce empty arrays.
#[utoipa::path(
    get,
    path = "/sp500-data",
    tag = "Market",
    summary = "S&P 500 chart data",
    responses(
        (status = 200, description = "Dates and closing prices (empty on upstream failure)", body = MarketSeries),
    )
)]
pub async fn sp500_data(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.market.fetch_spy_series().await)
}

/// Market routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sp500-data", get(sp500_data))
}

//! HTTP client for daily `SPY` bars with bounded retries.

use std::collections::HashMap;

use chrono::{NaiveDate, TimeDelta, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::MarketConfig;
use crate::error::GatewayError;

/// Ticker charted on the landing page.
const SYMBOL: &str = "SPY";

/// Days of history requested, ending yesterday.
const HISTORY_DAYS: i64 = 365;

/// Chart-ready price series: parallel arrays of bar timestamps and closes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarketSeries {
    /// Bar timestamps as returned upstream (RFC 3339).
    pub dates: Vec<String>,
    /// Closing prices.
    pub prices: Vec<f64>,
}

impl MarketSeries {
    /// Returns `true` if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct BarsResponse {
    #[serde(default)]
    bars: Option<HashMap<String, Vec<Bar>>>,
}

#[derive(Debug, Deserialize)]
struct Bar {
    /// Bar start time.
    t: String,
    /// Close price.
    c: f64,
}

impl BarsResponse {
    fn into_series(self) -> Option<MarketSeries> {
        let bars = self.bars?.remove(SYMBOL)?;
        if bars.is_empty() {
            return None;
        }
        let (dates, prices) = bars.into_iter().map(|bar| (bar.t, bar.c)).unzip();
        Some(MarketSeries { dates, prices })
    }
}

/// Outcome of a single upstream request.
#[derive(Debug)]
enum Attempt {
    Done(MarketSeries),
    Retry(String),
    Stop(String),
}

/// Client for an Alpaca-compatible market data API.
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    http: reqwest::Client,
    config: MarketConfig,
}

impl MarketDataClient {
    /// Builds the client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the HTTP client cannot be
    /// constructed (e.g. TLS backend initialization failure).
    pub fn new(config: MarketConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("http client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Fetches one year of daily `SPY` closes.
    ///
    /// Never fails: on missing configuration, non-retryable status codes
    /// or exhausted retries the error is logged and an empty series is
    /// returned.
    pub async fn fetch_spy_series(&self) -> MarketSeries {
        match self.try_fetch(Utc::now().date_naive()).await {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(error = %e, "market data unavailable, serving empty series");
                MarketSeries::default()
            }
        }
    }

    async fn try_fetch(&self, today: NaiveDate) -> Result<MarketSeries, GatewayError> {
        let (Some(base_url), Some(key), Some(secret)) = (
            self.config.base_url.as_deref(),
            self.config.api_key.as_deref(),
            self.config.api_secret.as_deref(),
        ) else {
            return Err(GatewayError::UpstreamUnavailable(
                "market data API is not configured".to_string(),
            ));
        };

        let url = bars_url(base_url, today);
        let attempts = self.config.max_attempts.max(1);
        let mut last_failure = String::new();

        for attempt in 1..=attempts {
            match self.attempt(&url, key, secret).await {
                Attempt::Done(series) => {
                    tracing::info!(points = series.dates.len(), attempt, "market data fetched");
                    return Ok(series);
                }
                Attempt::Stop(reason) => return Err(GatewayError::UpstreamUnavailable(reason)),
                Attempt::Retry(reason) => {
                    tracing::warn!(attempt, attempts, reason = %reason, "market data attempt failed");
                    last_failure = reason;
                }
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.retry_delay).await;
            }
        }

        Err(GatewayError::UpstreamUnavailable(format!(
            "gave up after {attempts} attempts: {last_failure}"
        )))
    }

    async fn attempt(&self, url: &str, key: &str, secret: &str) -> Attempt {
        let response = match self
            .http
            .get(url)
            .header("APCA-API-KEY-ID", key)
            .header("APCA-API-SECRET-KEY", secret)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(format!("request failed: {e}")),
        };

        let status = response.status();
        match status {
            StatusCode::OK => match response.json::<BarsResponse>().await {
                Ok(body) => body.into_series().map_or_else(
                    || Attempt::Retry(format!("no {SYMBOL} bars in response")),
                    Attempt::Done,
                ),
                Err(e) => Attempt::Retry(format!("malformed response: {e}")),
            },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                Attempt::Stop(format!("upstream returned {status}"))
            }
            _ => Attempt::Retry(format!("upstream returned {status}")),
        }
    }
}

/// Builds the bars URL for the year ending the day before `today`.
fn bars_url(base_url: &str, today: NaiveDate) -> String {
    let end = today - TimeDelta::days(1);
    let start = end - TimeDelta::days(HISTORY_DAYS);
    format!(
        "{}/stocks/bars?symbols={SYMBOL}&start={}&end={}&timeframe=1Day&limit=1000",
        base_url.trim_end_matches('/'),
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d"),
    )
}

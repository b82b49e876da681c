//! Upstream market data for the landing-page chart.
//!
//! [`MarketDataClient`] fetches one year of daily `SPY` bars from an
//! Alpaca-compatible data API. Every failure mode degrades to an empty
//! [`MarketSeries`]; callers never see an upstream error.

pub mod client;

pub use client::{MarketDataClient, MarketSeries};

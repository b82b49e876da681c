//! # landing-gateway
//!
//! Backend for a single product landing page: counts visitor interest,
//! collects email subscriptions, pushes the live interest count to every
//! open WebSocket and proxies one year of S&P 500 prices for the chart.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── InterestService (service/)
//!     ├── ConnectionHub (domain/)
//!     ├── MarketDataClient (market/)
//!     │
//!     ├── SqliteStore (persistence/)
//!     └── FileSnapshotter (persistence/)
//! ```
//!
//! Every committed write runs the durability hook before the new count is
//! broadcast, so a client never sees a count whose backup has not been
//! attempted.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod market;
pub mod persistence;
pub mod service;
pub mod ws;

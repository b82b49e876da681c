//! Service layer: business logic orchestration.
//!
//! [`InterestService`] coordinates the SQLite store, the durability hook
//! and the [`crate::domain::ConnectionHub`].

pub mod interest_service;

pub use interest_service::{AdminStats, DataExport, InterestService};

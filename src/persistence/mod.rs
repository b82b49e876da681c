//! Persistence layer: SQLite interest store and file snapshots.
//!
//! [`SqliteStore`] owns one long-lived `sqlx::SqlitePool` over the
//! application database file. After every committed write the service
//! runs a [`DurabilityHook`]; the default [`FileSnapshotter`] copies the
//! whole file into a rotating set of timestamped backups.

pub mod models;
pub mod snapshot;
pub mod sqlite;

pub use models::{InterestEvent, StoreSummary, Subscriber};
pub use snapshot::{DurabilityHook, FileSnapshotter, NoopHook, SnapshotError};
pub use sqlite::SqliteStore;

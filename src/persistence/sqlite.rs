//! SQLite implementation of the interest store.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use super::models::{InterestEvent, StoreSummary, Subscriber};
use crate::domain::CountSource;
use crate::error::GatewayError;

/// Schema applied on every startup; idempotent.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS interest_data (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    ip_address  TEXT NOT NULL,
    timestamp   TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS email_subscribers (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    email       TEXT NOT NULL UNIQUE,
    timestamp   TEXT NOT NULL
);
";

/// SQLite-backed store using a single `sqlx::SqlitePool`.
///
/// Writes run in their own transaction; SQLite serializes them, so two
/// concurrent [`SqliteStore::record_interest`] calls never observe the
/// same count.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if missing) the database file and applies the schema.
    ///
    /// The rollback journal is used instead of WAL so that a committed
    /// write is fully contained in the main file, which is what the
    /// snapshotter copies.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] if the file cannot be opened or
    /// the schema cannot be applied.
    pub async fn connect(path: impl AsRef<Path>, max_connections: u32) -> Result<Self, GatewayError> {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        tracing::info!(path = %path.display(), "sqlite store ready");
        Ok(Self { pool, path })
    }

    /// Returns the path of the database file.
    #[must_use]
    pub fn database_path(&self) -> &Path {
        &self.path
    }

    /// Appends one interest event and returns the new total.
    ///
    /// The same origin may be recorded any number of times.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on database failure.
    pub async fn record_interest(&self, origin: &str) -> Result<u64, GatewayError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO interest_data (ip_address, timestamp) VALUES (?, ?)")
            .bind(origin)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM interest_data")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(to_count(count))
    }

    /// Returns the number of committed interest events.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on database failure.
    pub async fn interest_count(&self) -> Result<u64, GatewayError> {
        self.scalar("SELECT COUNT(*) FROM interest_data").await
    }

    /// Appends one subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DuplicateEmail`] if the email is already
    /// present, or [`GatewayError::Storage`] on any other failure.
    pub async fn add_subscriber(&self, email: &str) -> Result<(), GatewayError> {
        let result = sqlx::query("INSERT INTO email_subscribers (email, timestamp) VALUES (?, ?)")
            .bind(email)
            .bind(Utc::now())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(GatewayError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the aggregate counters for the admin views.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on database failure.
    pub async fn summary(&self) -> Result<StoreSummary, GatewayError> {
        Ok(StoreSummary {
            total_interest: self.interest_count().await?,
            unique_visitors: self
                .scalar("SELECT COUNT(DISTINCT ip_address) FROM interest_data")
                .await?,
            total_subscribers: self.scalar("SELECT COUNT(*) FROM email_subscribers").await?,
        })
    }

    /// Returns interest events, newest first. `None` returns all rows.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on database failure.
    pub async fn recent_interest(&self, limit: Option<u32>) -> Result<Vec<InterestEvent>, GatewayError> {
        let rows = sqlx::query_as::<_, InterestEvent>(
            "SELECT id, ip_address, timestamp FROM interest_data \
             ORDER BY id DESC LIMIT ?",
        )
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Returns subscribers, newest first. `None` returns all rows.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] on database failure.
    pub async fn recent_subscribers(&self, limit: Option<u32>) -> Result<Vec<Subscriber>, GatewayError> {
        let rows = sqlx::query_as::<_, Subscriber>(
            "SELECT id, email, timestamp FROM email_subscribers \
             ORDER BY id DESC LIMIT ?",
        )
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Closes the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn scalar(&self, sql: &str) -> Result<u64, GatewayError> {
        let value = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(value))
    }
}

impl CountSource for SqliteStore {
    async fn current_count(&self) -> Result<u64, GatewayError> {
        self.interest_count().await
    }
}

/// SQLite treats a negative `LIMIT` as "no limit".
fn limit_param(limit: Option<u32>) -> i64 {
    limit.map_or(-1, i64::from)
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

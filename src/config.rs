//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Every key has a default except the
//! upstream market-data credentials, which are optional: without them the
//! chart endpoint simply returns an empty series.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Path of the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of pooled SQLite connections.
    pub database_max_connections: u32,

    /// Master switch for the backup-on-write policy.
    pub backup_enabled: bool,

    /// Directory receiving `app_backup_*` snapshot files.
    pub backup_dir: PathBuf,

    /// Number of snapshot files kept after each backup.
    pub backup_retention: usize,

    /// Shared secret guarding the admin endpoints. Empty rejects everyone.
    pub admin_password: String,

    /// Upstream market-data settings.
    pub market: MarketConfig,

    /// Public branding shown on the landing page.
    pub app: AppInfo,
}

/// Settings for the upstream market-data API.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// API key id sent as `APCA-API-KEY-ID`.
    pub api_key: Option<String>,
    /// API secret sent as `APCA-API-SECRET-KEY`.
    pub api_secret: Option<String>,
    /// Base URL of the data API (e.g. `https://data.alpaca.markets/v2`).
    pub base_url: Option<String>,
    /// Attempts per fetch before giving up.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

/// Branding strings for the landing page.
#[derive(Debug, Clone)]
pub struct AppInfo {
    /// Product name.
    pub name: String,
    /// One-line product description.
    pub description: String,
    /// Contact email address.
    pub email: String,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` cannot be parsed as a
    /// [`SocketAddr`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8000".to_string())
            .parse()?;

        let database_path = PathBuf::from(
            lookup("DATABASE_PATH").unwrap_or_else(|| "app.db".to_string()),
        );
        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5);

        let backup_enabled = parse_bool_or(&lookup, "BACKUP_ENABLED", true);
        let backup_dir =
            PathBuf::from(lookup("BACKUP_DIR").unwrap_or_else(|| "backups".to_string()));
        let backup_retention = parse_or(&lookup, "BACKUP_RETENTION", 5);

        let admin_password = lookup("ADMIN_PASSWORD").unwrap_or_default();

        let market = MarketConfig {
            api_key: non_empty(lookup("ALPACA_API_KEY")),
            api_secret: non_empty(lookup("ALPACA_API_SECRET")),
            base_url: non_empty(lookup("ALPACA_BASE_URL")),
            max_attempts: parse_or(&lookup, "MARKET_MAX_ATTEMPTS", 3),
            retry_delay: Duration::from_millis(parse_or(&lookup, "MARKET_RETRY_DELAY_MS", 1000)),
            request_timeout: Duration::from_secs(parse_or(&lookup, "MARKET_TIMEOUT_SECS", 15)),
        };

        let app = AppInfo {
            name: lookup("APP_NAME").unwrap_or_else(|| "Collective Auto Investment".to_string()),
            description: lookup("APP_DESCRIPTION").unwrap_or_else(|| {
                "A web application that helps users understand the power of systematic \
                 investment in the S&P 500 index."
                    .to_string()
            }),
            email: lookup("APP_EMAIL").unwrap_or_else(|| "ask.the.vault.1a@gmail.com".to_string()),
        };

        Ok(Self {
            listen_addr,
            database_path,
            database_max_connections,
            backup_enabled,
            backup_dir,
            backup_retention,
            admin_password,
            market,
            app,
        })
    }
}

/// Parses a key as `T`, returning `default` on missing or invalid values.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses a key as a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> GatewayConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let Ok(config) = GatewayConfig::from_lookup(|key| map.get(key).cloned()) else {
            panic!("config should parse");
        };
        config
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.listen_addr.port(), 8000);
        assert_eq!(config.database_path, PathBuf::from("app.db"));
        assert_eq!(config.backup_dir, PathBuf::from("backups"));
        assert_eq!(config.backup_retention, 5);
        assert!(config.backup_enabled);
        assert!(config.admin_password.is_empty());
        assert_eq!(config.market.max_attempts, 3);
        assert_eq!(config.market.retry_delay, Duration::from_secs(1));
        assert!(config.market.base_url.is_none());
        assert_eq!(config.app.name, "Collective Auto Investment");
        assert_eq!(config.app.email, "ask.the.vault.1a@gmail.com");
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("LISTEN_ADDR", "127.0.0.1:9100"),
            ("BACKUP_ENABLED", "FALSE"),
            ("BACKUP_RETENTION", "7"),
            ("ADMIN_PASSWORD", "letmein"),
            ("ALPACA_BASE_URL", "https://data.example.com/v2"),
            ("MARKET_RETRY_DELAY_MS", "250"),
        ]);
        assert_eq!(config.listen_addr.port(), 9100);
        assert!(!config.backup_enabled);
        assert_eq!(config.backup_retention, 7);
        assert_eq!(config.admin_password, "letmein");
        assert_eq!(
            config.market.base_url.as_deref(),
            Some("https://data.example.com/v2")
        );
        assert_eq!(config.market.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = config_from(&[("BACKUP_RETENTION", "many")]);
        assert_eq!(config.backup_retention, 5);
    }

    #[test]
    fn blank_credentials_are_treated_as_missing() {
        let config = config_from(&[("ALPACA_API_KEY", "  ")]);
        assert!(config.market.api_key.is_none());
    }

    #[test]
    fn bad_listen_addr_is_an_error() {
        let result = GatewayConfig::from_lookup(|key| {
            (key == "LISTEN_ADDR").then(|| "not-an-addr".to_string())
        });
        assert!(result.is_err());
    }
}

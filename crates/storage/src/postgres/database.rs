//! PostgreSQL pool for the thread API.
//!
//! The API only runs short keyset reads, so the pool fails fast on
//! acquisition and every session carries a statement timeout. A request
//! that would scan instead of seeking is cut off rather than holding a
//! connection.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{debug, instrument};

use agora_core::error::{StorageError, StorageResult};

/// Name reported in `pg_stat_activity`.
const APPLICATION_NAME: &str = "agora";

/// Pool and session settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a request waits for a free connection.
    pub acquire_timeout: Duration,
    /// Server-side cap on a single statement.
    pub statement_timeout: Duration,
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(3),
            statement_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(300),
        }
    }

    /// Parse the URL and attach the session settings.
    fn connect_options(&self) -> StorageResult<PgConnectOptions> {
        let options = PgConnectOptions::from_str(&self.url)
            .map_err(|e| StorageError::ConnectionError(format!("invalid database URL: {e}")))?;

        Ok(options.application_name(APPLICATION_NAME).options([(
            "statement_timeout",
            statement_timeout_setting(self.statement_timeout),
        )]))
    }
}

/// `statement_timeout` value in milliseconds, as PostgreSQL expects it.
fn statement_timeout_setting(timeout: Duration) -> String {
    format!("{}ms", timeout.as_millis())
}

/// Connection pool over the `threads` database.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    #[instrument(skip_all)]
    pub async fn connect(config: &DatabaseConfig) -> StorageResult<Self> {
        debug!(
            max_conn = config.max_connections,
            statement_timeout_ms = config.statement_timeout.as_millis() as u64,
            "Creating connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `threads` table and its keyset indexes if missing.
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> StorageResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::MigrationError(e.to_string()))?;

        debug!("Migrations completed");
        Ok(())
    }

    /// Check the pool answers and the `threads` table exists.
    ///
    /// A reachable database without the table (migrations never ran) is
    /// reported as unhealthy, since every page request would fail.
    pub async fn ping(&self) -> StorageResult<()> {
        let present: bool = sqlx::query_scalar("SELECT to_regclass('threads') IS NOT NULL")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?;

        if !present {
            return Err(StorageError::MigrationError(
                "threads table is missing; run with --migrate-only first".into(),
            ));
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_timeout_is_sent_in_milliseconds() {
        assert_eq!(statement_timeout_setting(Duration::from_secs(5)), "5000ms");
        assert_eq!(statement_timeout_setting(Duration::from_millis(250)), "250ms");
    }

    #[test]
    fn api_defaults_fail_fast() {
        let config = DatabaseConfig::new("postgres://db/agora");
        assert_eq!(config.url, "postgres://db/agora");
        assert!(config.acquire_timeout <= config.statement_timeout);
        assert!(config.min_connections <= config.max_connections);
        assert!(config.connect_options().is_ok());
    }

    #[test]
    fn invalid_url_is_a_connection_error() {
        let err = DatabaseConfig::new("not a url").connect_options().unwrap_err();
        assert!(matches!(err, StorageError::ConnectionError(_)));
    }
}

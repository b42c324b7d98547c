//! PostgreSQL database service
//!
//! Builds the connection pool the repositories run against:
//! - Connection pooling with min/max bounds
//! - Idle connection cleanup
//! - Connection lifetime cycling
//! - Statement timeout protection
//!
//! The pool itself implements [`QueryExecutor`](crate::data::QueryExecutor),
//! so repositories accept either the pool or any test double.

mod executor;
pub mod repositories;

pub use sqlx::PgPool;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::core::config::PostgresConfig;
use crate::core::constants::{
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_MAX_CONNECTIONS, POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS,
};
use crate::data::error::DataError;
use crate::data::executor::{QueryExecutor, Row, SqlValue};

/// PostgreSQL database service
///
/// Created once at startup and shared by reference with every repository
/// call. Holds no state besides the pool.
pub struct PostgresService {
    pool: PgPool,
}

impl PostgresService {
    /// Initialize the database service from configuration
    ///
    /// Zero-valued pool settings fall back to the defaults in
    /// `core::constants`. A statement timeout of zero disables it.
    pub async fn init(config: &PostgresConfig) -> Result<Self, DataError> {
        let url = config.url.as_str();
        if url.is_empty() {
            return Err(DataError::Config("PostgreSQL URL is required".into()));
        }

        let max_connections = non_zero_or(config.max_connections, POSTGRES_DEFAULT_MAX_CONNECTIONS);
        let min_connections = non_zero_or(config.min_connections, POSTGRES_DEFAULT_MIN_CONNECTIONS)
            .min(max_connections);
        let acquire_timeout =
            non_zero_or(config.acquire_timeout_secs, POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS);
        let idle_timeout = non_zero_or(config.idle_timeout_secs, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS);
        let max_lifetime = non_zero_or(config.max_lifetime_secs, POSTGRES_DEFAULT_MAX_LIFETIME_SECS);
        let statement_timeout = config.statement_timeout_secs;

        let mut options: PgConnectOptions = url
            .parse()
            .map_err(|e| DataError::Config(format!("Invalid PostgreSQL URL: {}", e)))?;

        if statement_timeout > 0 {
            options = options.options([("statement_timeout", format!("{}s", statement_timeout))]);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .connect_with(options)
            .await?;

        tracing::debug!(
            max_connections,
            min_connections,
            acquire_timeout_secs = acquire_timeout,
            idle_timeout_secs = idle_timeout,
            max_lifetime_secs = max_lifetime,
            statement_timeout_secs = statement_timeout,
            "PostgresService initialized"
        );
        Ok(Self { pool })
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("PostgreSQL pool closed");
    }
}

#[async_trait]
impl QueryExecutor for PostgresService {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DataError> {
        self.pool.query(sql, params).await
    }
}

fn non_zero_or<T: Default + PartialEq>(value: T, default: T) -> T {
    if value == T::default() { default } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> PostgresConfig {
        PostgresConfig {
            url: url.to_string(),
            max_connections: 0,
            min_connections: 0,
            acquire_timeout_secs: 0,
            idle_timeout_secs: 0,
            max_lifetime_secs: 0,
            statement_timeout_secs: 0,
        }
    }

    #[test]
    fn test_non_zero_or() {
        assert_eq!(non_zero_or(0u32, 10), 10);
        assert_eq!(non_zero_or(4u32, 10), 4);
        assert_eq!(non_zero_or(0u64, 30), 30);
    }

    #[tokio::test]
    async fn test_init_rejects_empty_url() {
        let err = PostgresService::init(&config("")).await.err().unwrap();
        assert!(matches!(err, DataError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: PostgreSQL URL is required");
    }

    #[tokio::test]
    async fn test_init_rejects_invalid_url() {
        let err = PostgresService::init(&config("not a url")).await.err().unwrap();
        assert!(matches!(err, DataError::Config(ref msg) if msg.starts_with("Invalid PostgreSQL URL")));
    }
}

//! PostgreSQL database service
//!
//! Runs compiled filter queries. The pool is small and short-lived: the CLI
//! opens it for one command and closes it on the way out.

pub mod error;

pub use error::PostgresError;
pub use sqlx::PgPool;

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, Row};
use tracing::log::LevelFilter;

use crate::core::constants::{
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_MAX_CONNECTIONS,
    POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
};
use crate::filters::PgQueryBuilder;

/// PostgreSQL database service
pub struct PostgresService {
    pool: PgPool,
}

impl PostgresService {
    /// Connect a pool for `url`
    ///
    /// A statement timeout is set at connection level so a filter over a
    /// large unindexed JSON column cannot run forever.
    pub async fn init(url: &str) -> Result<Self, PostgresError> {
        if url.is_empty() {
            return Err(PostgresError::Config("PostgreSQL URL is required".into()));
        }

        let mut options: PgConnectOptions = url
            .parse()
            .map_err(|e| PostgresError::Config(format!("Invalid PostgreSQL URL: {}", e)))?;

        options = options.log_statements(LevelFilter::Trace);
        options = options.options([(
            "statement_timeout",
            format!("{}s", POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS),
        )]);

        let pool = PgPoolOptions::new()
            .max_connections(POSTGRES_DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await?;

        tracing::debug!(
            max_connections = POSTGRES_DEFAULT_MAX_CONNECTIONS,
            statement_timeout_secs = POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
            "PostgresService initialized"
        );
        Ok(Self { pool })
    }

    /// Count rows matching the builder's predicates
    pub async fn count(&self, qb: &PgQueryBuilder) -> Result<i64, PostgresError> {
        let sql = qb.to_sql("COUNT(*)");
        tracing::debug!(sql = %sql, params = qb.params().len(), "Counting filtered rows");

        let row = qb.build(&sql).fetch_one(&self.pool).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("PostgreSQL pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_rejects_empty_url() {
        let err = PostgresService::init("").await.err().unwrap();
        assert!(matches!(err, PostgresError::Config(_)));
    }

    #[tokio::test]
    async fn test_init_rejects_malformed_url() {
        let err = PostgresService::init("not a url").await.err().unwrap();
        assert!(err.to_string().contains("Invalid PostgreSQL URL"));
    }
}

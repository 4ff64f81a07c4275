//! SQL abstraction layer
//!
//! This module identifies the database platform behind a connection and
//! provides the dialect used to render JSON filter predicates. Only
//! PostgreSQL offers the JSON path extraction the filters rely on.

mod dialect;
mod postgres_dialect;

pub use dialect::SqlDialect;
pub use postgres_dialect::PostgresDialect;

use serde::{Deserialize, Serialize};

/// Database backend identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Sqlite,
    Postgres,
    Mysql,
    Duckdb,
    Clickhouse,
}

impl Backend {
    /// Get the SQL dialect for this backend, if it supports JSON path filters
    pub fn json_dialect(&self) -> Option<&'static dyn SqlDialect> {
        match self {
            Backend::Postgres => Some(&PostgresDialect),
            Backend::Sqlite | Backend::Mysql | Backend::Duckdb | Backend::Clickhouse => None,
        }
    }

    /// Whether JSON filters can run against this backend
    pub fn is_json_capable(&self) -> bool {
        self.json_dialect().is_some()
    }

    /// Get the backend name
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::Postgres => "postgres",
            Backend::Mysql => "mysql",
            Backend::Duckdb => "duckdb",
            Backend::Clickhouse => "clickhouse",
        }
    }

    /// Detect the backend from a connection URL scheme
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split_once(':').map(|(s, _)| s)?;
        match scheme.to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Backend::Postgres),
            "sqlite" => Some(Backend::Sqlite),
            "mysql" | "mariadb" => Some(Backend::Mysql),
            "duckdb" => Some(Backend::Duckdb),
            "clickhouse" => Some(Backend::Clickhouse),
            _ => None,
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

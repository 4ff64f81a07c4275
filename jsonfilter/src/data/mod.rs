//! Data storage layer
//!
//! - `sql` - SQL dialects and backend detection
//! - `postgres` - PostgreSQL pool used to execute compiled filters

pub mod postgres;
pub mod sql;

pub use postgres::PostgresService;

//! JSON property filters for PostgreSQL resources
//!
//! - `filters` - filter configuration, compilation and query building
//! - `data` - SQL dialects and the PostgreSQL service
//! - `core` - CLI, configuration and constants for the binary

pub mod app;
pub mod core;
pub mod data;
pub mod filters;
pub mod utils;

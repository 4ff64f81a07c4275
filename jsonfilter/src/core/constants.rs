// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths, identifiers and log targets)
pub const APP_NAME_LOWER: &str = "jsonfilter";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "jsonfilter.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "JSONFILTER_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "JSONFILTER_LOG";

// =============================================================================
// Resources
// =============================================================================

/// Root alias used when a resource does not name one
pub const DEFAULT_ROOT_ALIAS: &str = "o";

// =============================================================================
// PostgreSQL
// =============================================================================

/// Environment variable for the PostgreSQL connection URL
pub const ENV_DATABASE_URL: &str = "JSONFILTER_DATABASE_URL";

/// Maximum pool connections (the CLI runs one query at a time)
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 2;

/// Seconds to wait for a pooled connection
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Server-side statement timeout in seconds
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

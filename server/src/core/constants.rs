// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "RecordQL";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "recordql";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".recordql";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "recordql.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "RECORDQL_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "RECORDQL_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "RECORDQL_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "RECORDQL_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "RECORDQL_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "RECORDQL_DATA_DIR";

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// Environment variable for the maximum pool size
pub const ENV_DB_MAX_CONNECTIONS: &str = "RECORDQL_DB_MAX_CONNECTIONS";

/// Environment variable for the per-query timeout
pub const ENV_DB_QUERY_TIMEOUT_SECS: &str = "RECORDQL_DB_QUERY_TIMEOUT_SECS";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "recordql.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 8;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;

/// Upper bound for one fetch (connection acquire + query) in seconds
pub const SQLITE_QUERY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -16000 = 16MB)
pub const SQLITE_CACHE_SIZE: &str = "-16000";

/// Pages between automatic WAL checkpoints
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval between explicit WAL checkpoints
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for API routes
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Body limit for query routes.
///
/// Twice the filter JSON limit so oversized filters reach the parser and get
/// a 400 with a stable error code instead of a bare 413.
pub const QUERY_BODY_LIMIT: usize = 128 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for in-flight requests during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// API
// =============================================================================

/// Prefix for versioned API routes
pub const API_PREFIX: &str = "/api/v1";

//! SQLite schema definitions
//!
//! `SCHEMA` always describes the latest version; later versions add their
//! incremental steps to `migrations.rs`.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- Person records
-- =============================================================================
CREATE TABLE IF NOT EXISTS person (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    email_address TEXT NOT NULL,
    age INTEGER,
    -- calendar date, YYYY-MM-DD
    created_at TEXT CHECK(created_at IS NULL OR length(created_at) = 10)
);

CREATE INDEX IF NOT EXISTS idx_person_age ON person(age);
CREATE INDEX IF NOT EXISTS idx_person_created_at ON person(created_at);
"#;

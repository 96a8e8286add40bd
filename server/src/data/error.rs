//! Unified error type for the data layer

use thiserror::Error;

use super::sqlite::SqliteError;

/// A failed fetch, as seen by callers of the record store
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection acquire plus query exceeded the configured bound
    #[error("Query timeout after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// No pooled connection became available
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A fetched row could not be mapped into a record
    #[error("Failed to serialize {kind}.{field}: {error}")]
    Serialize {
        kind: String,
        field: String,
        error: String,
    },
}

impl DataError {
    /// Create a SQLite error, separating pool exhaustion from query failures
    pub fn from_sqlite(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => Self::PoolExhausted,
            e => Self::Sqlite(e),
        }
    }

    /// Create a timeout error
    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::PoolExhausted => true,
            Self::Sqlite(e) => matches!(e, sqlx::Error::PoolClosed | sqlx::Error::Io(_)),
            _ => false,
        }
    }
}

impl From<SqliteError> for DataError {
    fn from(e: SqliteError) -> Self {
        match e {
            SqliteError::Database(e) => Self::from_sqlite(e),
            SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                version,
                name,
                error,
            },
            SqliteError::Io(e) => Self::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_error_display() {
        let err = DataError::timeout(30);
        assert_eq!(err.to_string(), "Query timeout after 30s");
    }

    #[test]
    fn test_pool_timeout_maps_to_exhausted() {
        let err: DataError = SqliteError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, DataError::PoolExhausted));
        assert_eq!(err.to_string(), "Connection pool exhausted");
    }

    #[test]
    fn test_migration_error_conversion() {
        let err: DataError = SqliteError::MigrationFailed {
            version: 2,
            name: "add_person_filter_indexes".into(),
            error: "boom".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_person_filter_indexes) failed: boom"
        );
    }

    #[test]
    fn test_is_transient() {
        assert!(DataError::timeout(30).is_transient());
        assert!(DataError::PoolExhausted.is_transient());
        assert!(DataError::from_sqlite(sqlx::Error::PoolClosed).is_transient());
        assert!(!DataError::from_sqlite(sqlx::Error::RowNotFound).is_transient());
        assert!(
            !DataError::Serialize {
                kind: "person".into(),
                field: "id".into(),
                error: "bad".into(),
            }
            .is_transient()
        );
    }
}

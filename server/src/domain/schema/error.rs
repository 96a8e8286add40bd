//! Schema registration errors

use thiserror::Error;

/// Errors raised while declaring record kinds or building the registry.
///
/// All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Filter on unknown field '{field}' of record kind '{kind}'")]
    UnknownField { kind: String, field: String },

    #[error("Field '{field}' declared twice on record kind '{kind}'")]
    DuplicateField { kind: String, field: String },

    #[error("Record kind '{0}' has no primary key")]
    MissingPrimaryKey(String),

    #[error("Record kind '{0}' declares more than one primary key")]
    MultiplePrimaryKeys(String),

    #[error("Record kind '{0}' is already registered")]
    DuplicateKind(String),

    #[error("Operation '{0}' is already registered")]
    DuplicateOperation(String),

    #[error("Synthesized input type '{0}' is already registered")]
    DuplicateTypeName(String),

    #[error("Invalid identifier '{0}' (expected lowercase snake_case)")]
    InvalidIdentifier(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_display() {
        let err = SchemaError::UnknownField {
            kind: "person".to_string(),
            field: "nickname".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Filter on unknown field 'nickname' of record kind 'person'"
        );
    }

    #[test]
    fn test_duplicate_operation_display() {
        let err = SchemaError::DuplicateOperation("people".to_string());
        assert_eq!(err.to_string(), "Operation 'people' is already registered");
    }

    #[test]
    fn test_duplicate_type_name_display() {
        let err = SchemaError::DuplicateTypeName("PeopleNameXFilterInput".to_string());
        assert_eq!(
            err.to_string(),
            "Synthesized input type 'PeopleNameXFilterInput' is already registered"
        );
    }
}

//! Filter input errors

use thiserror::Error;

use crate::domain::schema::BaseType;

/// Malformed filter input detected while validating request arguments
/// against the derived input shapes.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Filter arguments must be a JSON object")]
    NotAnObject,

    #[error("Invalid filter JSON: {0}")]
    InvalidJson(String),

    #[error("Filter JSON exceeds maximum size of {max} bytes")]
    TooLarge { max: usize },

    #[error("Unknown argument '{0}'")]
    UnknownArgument(String),

    #[error("Missing required argument '{0}'")]
    MissingRequired(String),

    #[error("Argument '{field}' expects type {expected}")]
    TypeMismatch { field: String, expected: String },

    #[error("Argument '{field}' accepts at most {max} values")]
    TooManyValues { field: String, max: usize },
}

impl FilterError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAnObject => "INVALID_FILTER_ARGUMENTS",
            Self::InvalidJson(_) => "INVALID_FILTER_JSON",
            Self::TooLarge { .. } => "FILTER_JSON_TOO_LARGE",
            Self::UnknownArgument(_) => "UNKNOWN_ARGUMENT",
            Self::MissingRequired(_) => "MISSING_REQUIRED_ARGUMENT",
            Self::TypeMismatch { .. } => "ARGUMENT_TYPE_MISMATCH",
            Self::TooManyValues { .. } => "TOO_MANY_VALUES",
        }
    }

    pub(crate) fn mismatch(field: &str, base_type: BaseType, list: bool) -> Self {
        let expected = if list {
            format!("[{}]", base_type)
        } else {
            base_type.to_string()
        };
        Self::TypeMismatch {
            field: field.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message() {
        let err = FilterError::mismatch("age", BaseType::Int, false);
        assert_eq!(err.to_string(), "Argument 'age' expects type int");
        let err = FilterError::mismatch("id", BaseType::Int, true);
        assert_eq!(err.to_string(), "Argument 'id' expects type [int]");
        assert_eq!(err.code(), "ARGUMENT_TYPE_MISMATCH");
    }
}

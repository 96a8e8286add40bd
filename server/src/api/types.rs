//! Shared API types
//!
//! Error responses and the `{"data": ...}` envelopes of the query endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::data::DataError;
use crate::domain::FilterError;

/// `{"data": [record, ...]}` returned by list operations
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordListResponse {
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Value>,
}

/// `{"data": record}` or `{"data": null}` returned by get operations
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordResponse {
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

/// Error body returned by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    pub message: String,
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn unknown_operation(name: &str) -> Self {
        Self::not_found("UNKNOWN_OPERATION", format!("Unknown operation: {}", name))
    }

    pub fn from_filter(e: FilterError) -> Self {
        tracing::debug!(error = %e, "Rejected filter arguments");
        Self::bad_request(e.code(), e.to_string())
    }

    pub fn from_data(e: DataError) -> Self {
        tracing::error!(error = %e, transient = e.is_transient(), "Data error");
        Self::internal("Database operation failed")
    }
}

impl From<FilterError> for ApiError {
    fn from(e: FilterError) -> Self {
        Self::from_filter(e)
    }
}

impl From<DataError> for ApiError {
    fn from(e: DataError) -> Self {
        Self::from_data(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(ErrorBody {
                error: error_type.to_string(),
                code,
                message,
            }),
        )
            .into_response()
    }
}

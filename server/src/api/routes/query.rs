//! Record query endpoints
//!
//! `POST /api/v1/query/{operation}` runs a list operation with the request
//! body as its filter arguments. `GET /api/v1/query/{operation}/{id}` runs a
//! get-by-identifier operation.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::types::{ApiError, ErrorBody, RecordListResponse, RecordResponse};
use crate::data::RecordStore;
use crate::domain::SchemaRegistry;
use crate::domain::filter::{FilterError, FilterValue, compile, parse_arguments_json};

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct QueryApiState {
    pub registry: Arc<SchemaRegistry>,
    pub store: Arc<RecordStore>,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(registry: Arc<SchemaRegistry>, store: Arc<RecordStore>) -> Router<()> {
    let state = QueryApiState { registry, store };
    Router::new()
        .route("/{operation}", post(list_records))
        .route("/{operation}/{id}", get(get_record))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Run a list operation
///
/// The body is a JSON object mapping filterable field names to filter
/// values. An empty body lists every record.
#[utoipa::path(
    post,
    path = "/api/v1/query/{operation}",
    tag = "query",
    params(("operation" = String, Path, description = "List operation name, e.g. `people`")),
    request_body(content = Object, description = "Filter arguments", content_type = "application/json"),
    responses(
        (status = 200, description = "Matching records", body = RecordListResponse),
        (status = 400, description = "Malformed filter arguments", body = ErrorBody),
        (status = 404, description = "Unknown operation", body = ErrorBody)
    )
)]
pub async fn list_records(
    State(state): State<QueryApiState>,
    Path(operation): Path<String>,
    body: Bytes,
) -> Result<Json<RecordListResponse>, ApiError> {
    let op = state
        .registry
        .resolve_list(&operation)
        .ok_or_else(|| ApiError::unknown_operation(&operation))?;
    let kind = Arc::clone(&op.kind);

    let args = parse_arguments_json(&body, &op.signature.parameters)?;
    let predicate = compile(&kind, &args);
    let data = state.store.list(&kind, predicate).await?;

    Ok(Json(RecordListResponse { data }))
}

/// Run a get-by-identifier operation
///
/// A missing record is a normal result: `{"data": null}`.
#[utoipa::path(
    get,
    path = "/api/v1/query/{operation}/{id}",
    tag = "query",
    params(
        ("operation" = String, Path, description = "Get operation name, e.g. `person`"),
        ("id" = String, Path, description = "Primary key value")
    ),
    responses(
        (status = 200, description = "The record, or null when absent", body = RecordResponse),
        (status = 400, description = "Identifier has the wrong type", body = ErrorBody),
        (status = 404, description = "Unknown operation", body = ErrorBody)
    )
)]
pub async fn get_record(
    State(state): State<QueryApiState>,
    Path((operation, id)): Path<(String, String)>,
) -> Result<Json<RecordResponse>, ApiError> {
    let op = state
        .registry
        .resolve_get(&operation)
        .ok_or_else(|| ApiError::unknown_operation(&operation))?;
    let kind = Arc::clone(&op.kind);

    let pk = kind.primary_key();
    let id = FilterValue::parse_str(pk.base_type, &id)
        .ok_or_else(|| FilterError::mismatch(&pk.name, pk.base_type, false))?;
    let data = state.store.get(&kind, id).await?;

    Ok(Json(RecordResponse { data }))
}

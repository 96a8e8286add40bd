//! Schema introspection endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::domain::SchemaRegistry;

pub fn routes(registry: Arc<SchemaRegistry>) -> Router<()> {
    Router::new()
        .route("/", get(get_schema))
        .with_state(registry)
}

/// Record kinds, operation signatures and derived filter input shapes
#[utoipa::path(
    get,
    path = "/api/v1/schema",
    tag = "schema",
    responses(
        (status = 200, description = "Registered record kinds and operations")
    )
)]
pub async fn get_schema(State(registry): State<Arc<SchemaRegistry>>) -> Response {
    Json(registry.describe()).into_response()
}

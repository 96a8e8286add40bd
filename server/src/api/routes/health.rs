//! Readiness endpoint
//!
//! Reports the registered operation count and whether the record store
//! answers a round-trip on a pooled connection.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::RecordStore;
use crate::domain::SchemaRegistry;

#[derive(Clone)]
pub struct HealthState {
    registry: Arc<SchemaRegistry>,
    store: Arc<RecordStore>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `unavailable`
    pub status: &'static str,
    pub version: &'static str,
    /// Registered list and get operations
    pub operations: usize,
    pub database: bool,
}

pub fn routes(registry: Arc<SchemaRegistry>, store: Arc<RecordStore>) -> Router<()> {
    Router::new()
        .route("/", get(health))
        .with_state(HealthState { registry, store })
}

/// Service readiness, including a store round-trip
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the record store");
            false
        }
    };

    let (code, status) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            operations: state.registry.operations().count(),
            database,
        }),
    )
}

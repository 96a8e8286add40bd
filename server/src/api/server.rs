//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{health, query, schema};
use crate::core::CoreApp;
use crate::core::constants::{API_PREFIX, DEFAULT_BODY_LIMIT, QUERY_BODY_LIMIT};
use crate::data::RecordStore;
use crate::domain::SchemaRegistry;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let router = build_router(
            Arc::clone(&app.registry),
            Arc::clone(&app.store),
            &allowed_origins,
        );

        let listener = TcpListener::bind(addr).await?;
        tracing::debug!(%addr, "HTTP server listening");
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Assemble every route with its middleware stack
pub fn build_router(
    registry: Arc<SchemaRegistry>,
    store: Arc<RecordStore>,
    allowed_origins: &AllowedOrigins,
) -> Router {
    let query_routes = query::routes(Arc::clone(&registry), Arc::clone(&store))
        .layer(DefaultBodyLimit::max(QUERY_BODY_LIMIT));

    Router::new()
        .nest(
            &format!("{}/health", API_PREFIX),
            health::routes(Arc::clone(&registry), Arc::clone(&store)),
        )
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .nest(&format!("{}/schema", API_PREFIX), schema::routes(registry))
        .nest(&format!("{}/query", API_PREFIX), query_routes)
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(allowed_origins))
        .layer(middleware::trace())
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}

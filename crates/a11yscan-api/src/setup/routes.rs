//! Route configuration and setup.

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use a11yscan_core::Config;

use crate::api_doc::ApiDoc;
use crate::handlers::{diagnostics, health, queue_scan, scan, worker};
use crate::state::AppState;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Result<Router<()>> {
    let cors = setup_cors(&state.config)?;

    let docs: Router<()> =
        RapiDoc::with_openapi("/api/openapi.json", ApiDoc::openapi()).path("/docs").into();

    let app = Router::new()
        .route("/queue-scan", post(queue_scan::queue_scan))
        .route("/scan", post(scan::scan))
        .route(
            "/worker",
            get(worker::run_single_pass).post(worker::run_bounded),
        )
        .route("/diagnostics/queue", get(diagnostics::queue_diagnostics))
        .route("/diagnostics/email", post(diagnostics::send_test_email))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .with_state(state)
        .merge(docs)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer> {
    let methods = [Method::GET, Method::POST];
    let cors = if config.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(Any)
            .allow_origin(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
            })
            .collect::<Result<Vec<_>>>()?;
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(Any)
            .allow_origin(origins)
    };
    Ok(cors)
}

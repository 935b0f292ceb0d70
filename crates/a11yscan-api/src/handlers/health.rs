//! Health check handlers and response types.
//!
//! No database backs this service; the only persisted state is the queue
//! service itself, so health reports configuration state rather than probing
//! dependencies on every request.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
pub(crate) struct HealthCheckResponse {
    pub status: String,
    pub queue: String,
    pub smtp: String,
    pub scanner: String,
}

fn configured(flag: bool) -> String {
    if flag { "configured" } else { "not_configured" }.to_string()
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Health report: configuration state of the queue, SMTP, and scanner.
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> impl IntoResponse {
    let config = &state.config;
    let queue_configured = config.queue_backend == "memory"
        || (config.aws_region.is_some()
            && config.sqs_queue_url.is_some()
            && config.aws_access_key_id.is_some()
            && config.aws_secret_access_key.is_some());

    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        queue: configured(queue_configured),
        smtp: configured(config.smtp_host.is_some() && config.smtp_from.is_some()),
        scanner: configured(config.scanner_endpoint.is_some()),
    };

    (StatusCode::OK, Json(response))
}

//! Operator diagnostics: queue connectivity probe and a test email send.
//! Both endpoints are protected by the worker secret.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use a11yscan_core::AppError;
use a11yscan_queue::QueueDiagnostics;

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::worker::WorkerQuery;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueueDiagnosticsResponse {
    pub success: bool,
    pub message: String,
    pub diagnostics: QueueDiagnostics,
}

#[utoipa::path(
    get,
    path = "/diagnostics/queue",
    tag = "diagnostics",
    params(("secret" = Option<String>, Query, description = "Worker secret (alternative to bearer token)")),
    responses(
        (status = 200, description = "Queue reachable", body = QueueDiagnosticsResponse),
        (status = 401, description = "Invalid worker secret", body = ErrorResponse),
        (status = 500, description = "Queue unreachable or misconfigured", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, query))]
pub async fn queue_diagnostics(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<WorkerQuery>,
) -> Result<Json<QueueDiagnosticsResponse>, HttpAppError> {
    crate::auth::authorize_worker(&state.config, &headers, query.secret.as_deref())?;

    tracing::info!("Probing queue backend");
    let diagnostics = state.queue.diagnose().await;

    if !diagnostics.reachable {
        let detail = diagnostics
            .error
            .clone()
            .unwrap_or_else(|| "queue probe failed".to_string());
        return Err(AppError::QueueUnavailable(detail).into());
    }

    Ok(Json(QueueDiagnosticsResponse {
        success: true,
        message: "Queue connection successful".to_string(),
        diagnostics,
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TestEmailRequest {
    pub to: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TestEmailResponse {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/diagnostics/email",
    tag = "diagnostics",
    request_body = TestEmailRequest,
    params(("secret" = Option<String>, Query, description = "Worker secret (alternative to bearer token)")),
    responses(
        (status = 200, description = "Test email sent", body = TestEmailResponse),
        (status = 401, description = "Invalid worker secret", body = ErrorResponse),
        (status = 500, description = "SMTP unconfigured or send failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, query, body))]
pub async fn send_test_email(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<WorkerQuery>,
    Json(body): Json<TestEmailRequest>,
) -> Result<Json<TestEmailResponse>, HttpAppError> {
    crate::auth::authorize_worker(&state.config, &headers, query.secret.as_deref())?;

    let mailer = state.scan.mailer().ok_or_else(|| {
        AppError::Internal("SMTP is not configured (set SMTP_HOST and SMTP_FROM)".to_string())
    })?;

    mailer
        .send_report(
            &body.to,
            "a11yscan test email",
            "This is a test email from the accessibility scan service.",
        )
        .await
        .map_err(|e| AppError::Internal(format!("Test email failed: {e}")))?;

    Ok(Json(TestEmailResponse {
        success: true,
        message: format!("Test email sent to {}", body.to),
    }))
}

//! Enqueue gateway: validates the request, builds a job record, and appends
//! one durable message to the queue. Does not wait for processing.

use axum::{extract::State, http::HeaderMap, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use a11yscan_core::models::{ScanJob, ScanOptions};
use a11yscan_core::{is_url_safe, AppError};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::ip_extraction::extract_client_ip;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueueScanRequest {
    pub session_id: Option<String>,
    pub url: Option<String>,
    pub report_email: Option<String>,
    #[serde(default)]
    pub options: ScanOptions,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueueScanResponse {
    pub success: bool,
    pub job_id: String,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/queue-scan",
    tag = "scans",
    request_body = QueueScanRequest,
    responses(
        (status = 200, description = "Scan queued", body = QueueScanResponse),
        (status = 400, description = "Missing fields or unsafe URL", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Queue unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, body))]
pub async fn queue_scan(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidatedJson(body): ValidatedJson<QueueScanRequest>,
) -> Result<Json<QueueScanResponse>, HttpAppError> {
    let client_ip = extract_client_ip(&headers, state.config.trusted_proxy_count);
    let decision = state
        .limiter
        .check(&format!("ip:{client_ip}"), state.config.enqueue_rate_limit)
        .await;
    if !decision.allowed {
        return Err(AppError::RateLimited {
            reset_at_ms: decision.reset_at_ms,
        }
        .into());
    }

    let (Some(session_id), Some(url), Some(report_email)) =
        (body.session_id, body.url, body.report_email)
    else {
        return Err(AppError::BadRequest("Missing required fields".to_string()).into());
    };

    if !is_url_safe(&url) {
        return Err(AppError::UnsafeUrl(url).into());
    }

    let job = ScanJob::new(session_id, url, report_email, body.options);
    tracing::info!(job_id = %job.id, url = %job.url, "Queueing scan job");

    state.queue.enqueue(&job).await?;

    Ok(Json(QueueScanResponse {
        success: true,
        job_id: job.id,
        message: "Scan queued successfully".to_string(),
    }))
}

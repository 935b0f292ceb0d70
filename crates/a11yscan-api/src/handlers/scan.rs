//! Synchronous scan endpoint: validates the target, runs the scanner inline,
//! and returns the per-page results with a summary. No queueing, no email.

use axum::{extract::State, http::HeaderMap, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use a11yscan_core::models::{PageResult, ScanOptions, ScanSummary};
use a11yscan_core::{is_url_safe, AppError};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::report;
use crate::state::AppState;
use crate::utils::ip_extraction::extract_client_ip;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub url: Option<String>,
    #[serde(default)]
    pub options: ScanOptions,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub success: bool,
    pub results: Vec<PageResult>,
    pub summary: ScanSummary,
    pub report_id: String,
}

#[utoipa::path(
    post,
    path = "/scan",
    tag = "scans",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan finished", body = ScanResponse),
        (status = 400, description = "Missing or unsafe URL", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Scan failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, body))]
pub async fn scan(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidatedJson(body): ValidatedJson<ScanRequest>,
) -> Result<Json<ScanResponse>, HttpAppError> {
    let client_ip = extract_client_ip(&headers, state.config.trusted_proxy_count);
    let decision = state
        .limiter
        .check(&format!("ip:{client_ip}"), state.config.scan_rate_limit)
        .await;
    if !decision.allowed {
        return Err(AppError::RateLimited {
            reset_at_ms: decision.reset_at_ms,
        }
        .into());
    }

    let Some(url) = body.url else {
        return Err(AppError::BadRequest("URL is required".to_string()).into());
    };

    if !is_url_safe(&url) {
        return Err(AppError::UnsafeUrl(url).into());
    }

    tracing::info!(target_url = %url, "Received synchronous scan request");
    // Options may carry credentials; the Debug impl redacts them
    tracing::debug!(options = ?body.options, "Scan options");

    let results = state
        .scan
        .scan(&url, &body.options)
        .await
        .map_err(|e| AppError::PipelineFailure(e.to_string()))?;

    let summary = ScanSummary::from_results(&url, &results);
    let report_id = report::report_id(&url);
    tracing::info!(report_id = %report_id, pages = summary.total_pages, "Scan finished");

    Ok(Json(ScanResponse {
        success: true,
        results,
        summary,
        report_id,
    }))
}

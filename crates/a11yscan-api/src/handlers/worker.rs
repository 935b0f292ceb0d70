//! Worker endpoints: drain the queue and run the scan pipeline.
//!
//! `GET /worker` is the single-pass mode (one lease of up to a batch of
//! messages, e.g. for an external scheduler). `POST /worker` is the
//! bounded-duration mode (lease one at a time until a job count or wall-clock
//! ceiling). Both authenticate via the shared worker secret.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

use a11yscan_worker::{JobOutcome, WorkerRunner, WorkerSummary};

use crate::auth::authorize_worker;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WorkerQuery {
    pub secret: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerRequest {
    /// Maximum jobs to process in this invocation
    pub max_jobs: Option<usize>,
    /// Wall-clock ceiling in milliseconds
    pub timeout: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerResponse {
    pub success: bool,
    pub message: String,
    pub processed_jobs: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<JobOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_elapsed: Option<u64>,
}

impl WorkerResponse {
    fn from_summary(summary: WorkerSummary, message: String) -> Self {
        Self {
            success: true,
            message,
            processed_jobs: summary.processed_jobs,
            successful: summary.successful,
            failed: summary.failed,
            results: summary.results,
            time_elapsed: summary.time_elapsed_ms,
        }
    }
}

#[utoipa::path(
    get,
    path = "/worker",
    tag = "worker",
    params(("secret" = Option<String>, Query, description = "Worker secret (alternative to bearer token)")),
    responses(
        (status = 200, description = "Batch processed", body = WorkerResponse),
        (status = 401, description = "Invalid worker secret", body = ErrorResponse),
        (status = 500, description = "Queue unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, query))]
pub async fn run_single_pass(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<WorkerQuery>,
) -> Result<Json<WorkerResponse>, HttpAppError> {
    authorize_worker(&state.config, &headers, query.secret.as_deref())?;

    tracing::info!("Checking for jobs in queue");
    let runner = WorkerRunner::new(state.queue.clone(), state.pipeline.clone());
    let summary = runner.run_single_pass(state.config.worker_max_batch).await?;

    let message = if summary.processed_jobs == 0 {
        "No jobs in queue".to_string()
    } else {
        format!("Processed {} jobs", summary.processed_jobs)
    };
    Ok(Json(WorkerResponse::from_summary(summary, message)))
}

#[utoipa::path(
    post,
    path = "/worker",
    tag = "worker",
    request_body = WorkerRequest,
    params(("secret" = Option<String>, Query, description = "Worker secret (alternative to bearer token)")),
    responses(
        (status = 200, description = "Bounded run finished", body = WorkerResponse),
        (status = 401, description = "Invalid worker secret", body = ErrorResponse),
        (status = 500, description = "Queue unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, query, body))]
pub async fn run_bounded(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<WorkerQuery>,
    body: Option<Json<WorkerRequest>>,
) -> Result<Json<WorkerResponse>, HttpAppError> {
    authorize_worker(&state.config, &headers, query.secret.as_deref())?;

    // Body is optional; defaults come from config
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let max_jobs = request
        .max_jobs
        .unwrap_or(state.config.worker_default_max_jobs)
        .max(1);
    let timeout =
        Duration::from_millis(request.timeout.unwrap_or(state.config.worker_default_timeout_ms));

    tracing::info!(max_jobs, timeout_ms = timeout.as_millis() as u64, "Starting bounded worker run");

    let runner = WorkerRunner::new(state.queue.clone(), state.pipeline.clone());
    let summary = runner.run_bounded(max_jobs, timeout).await?;

    Ok(Json(WorkerResponse::from_summary(
        summary,
        "Worker completed".to_string(),
    )))
}

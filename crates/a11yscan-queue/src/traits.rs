use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use a11yscan_core::models::ScanJob;
use a11yscan_core::AppError;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Region, queue URL, or credentials missing. Surfaced at call time.
    #[error("queue not configured: {0}")]
    NotConfigured(String),

    /// The backing service rejected the call or was unreachable.
    #[error("queue backend error: {0}")]
    Backend(String),

    #[error("failed to serialize job: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        AppError::QueueUnavailable(err.to_string())
    }
}

/// Transport wrapper around a serialized [`ScanJob`].
///
/// The receipt handle is a lease token valid only for the current visibility
/// window; it is the only way to acknowledge (delete) the message.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub body: String,
    pub receipt_handle: String,
}

/// Configuration and reachability report for the diagnostics endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueueDiagnostics {
    pub backend: String,
    pub region_configured: bool,
    pub queue_url_configured: bool,
    pub credentials_configured: bool,
    /// Whether a live probe of the backing service succeeded.
    pub reachable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available_queues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Durable at-least-once message queue holding pending scan jobs.
///
/// Delivery contract: a received message becomes invisible to other receivers
/// for a bounded visibility window. Messages that are not acknowledged within
/// that window become eligible for redelivery; that redelivery is the sole
/// retry mechanism. Callers must acknowledge only after a job has been fully
/// processed.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Serialize the job and append one durable message to the queue.
    async fn enqueue(&self, job: &ScanJob) -> Result<(), QueueError>;

    /// Lease up to `max_messages` messages. An empty queue yields an empty
    /// list, not an error.
    async fn receive(&self, max_messages: i32) -> Result<Vec<QueueMessage>, QueueError>;

    /// Permanently remove the message the receipt handle leases.
    async fn acknowledge(&self, receipt_handle: &str) -> Result<(), QueueError>;

    /// Report configuration state and probe the backing service.
    async fn diagnose(&self) -> QueueDiagnostics;
}

//! In-memory queue backend for tests and local development.
//!
//! Simulates the backing service's lease semantics: received messages become
//! invisible for the visibility timeout and reappear if not acknowledged.
//! Receipt handles are re-issued on every lease, so a stale handle from an
//! expired window no longer matches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use a11yscan_core::models::ScanJob;

use crate::traits::{JobQueue, QueueDiagnostics, QueueError, QueueMessage};

struct StoredMessage {
    body: String,
    receipt_handle: String,
    visible_at: Instant,
}

pub struct InMemoryJobQueue {
    messages: Mutex<Vec<StoredMessage>>,
    visibility_timeout: Duration,
    lease_counter: AtomicU64,
}

impl Default for InMemoryJobQueue {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl InMemoryJobQueue {
    pub fn new(visibility_timeout: Duration) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            visibility_timeout,
            lease_counter: AtomicU64::new(0),
        }
    }

    /// Append a raw message body, bypassing job serialization. Lets tests and
    /// local tooling inject malformed payloads.
    pub async fn push_raw(&self, body: impl Into<String>) {
        let mut messages = self.messages.lock().await;
        let n = self.lease_counter.fetch_add(1, Ordering::Relaxed);
        messages.push(StoredMessage {
            body: body.into(),
            receipt_handle: format!("rcpt-{n}"),
            visible_at: Instant::now(),
        });
    }

    /// Total messages held, leased or not.
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: &ScanJob) -> Result<(), QueueError> {
        let body = serde_json::to_string(job)?;
        self.push_raw(body).await;
        tracing::debug!(job_id = %job.id, "Scan job enqueued (in-memory)");
        Ok(())
    }

    async fn receive(&self, max_messages: i32) -> Result<Vec<QueueMessage>, QueueError> {
        let mut messages = self.messages.lock().await;
        let now = Instant::now();
        let mut leased = Vec::new();

        for stored in messages.iter_mut() {
            if leased.len() >= max_messages.max(0) as usize {
                break;
            }
            if stored.visible_at > now {
                continue;
            }
            // Re-issue the receipt handle for this lease window
            let n = self.lease_counter.fetch_add(1, Ordering::Relaxed);
            stored.receipt_handle = format!("rcpt-{n}");
            stored.visible_at = now + self.visibility_timeout;
            leased.push(QueueMessage {
                body: stored.body.clone(),
                receipt_handle: stored.receipt_handle.clone(),
            });
        }

        Ok(leased)
    }

    async fn acknowledge(&self, receipt_handle: &str) -> Result<(), QueueError> {
        let mut messages = self.messages.lock().await;
        let before = messages.len();
        messages.retain(|stored| stored.receipt_handle != receipt_handle);
        if messages.len() == before {
            return Err(QueueError::Backend(
                "unknown or expired receipt handle".to_string(),
            ));
        }
        Ok(())
    }

    async fn diagnose(&self) -> QueueDiagnostics {
        QueueDiagnostics {
            backend: "memory".to_string(),
            region_configured: true,
            queue_url_configured: true,
            credentials_configured: true,
            reachable: true,
            available_queues: Vec::new(),
            error: None,
        }
    }
}

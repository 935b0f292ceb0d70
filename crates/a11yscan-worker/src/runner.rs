use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use utoipa::ToSchema;

use a11yscan_core::models::{JobStatus, ScanJob};
use a11yscan_queue::{JobQueue, QueueError, QueueMessage};

use crate::pipeline::ScanPipeline;

/// Result of one delivered message.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobOutcome {
    /// None when the message body could not be deserialized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of one worker invocation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSummary {
    pub processed_jobs: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<JobOutcome>,
    /// Wall-clock time of the invocation; reported by bounded-duration mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_elapsed_ms: Option<u64>,
}

impl WorkerSummary {
    fn from_outcomes(results: Vec<JobOutcome>, elapsed: Option<Duration>) -> Self {
        let successful = results
            .iter()
            .filter(|r| r.status == JobStatus::Completed)
            .count();
        Self {
            processed_jobs: results.len(),
            successful,
            failed: results.len() - successful,
            results,
            time_elapsed_ms: elapsed.map(|d| d.as_millis() as u64),
        }
    }
}

/// Leases jobs from the queue, runs the pipeline, and acknowledges only on
/// success. Messages are processed sequentially; one failing job never aborts
/// the rest of the batch.
///
/// A message is deleted only after the full pipeline has returned without
/// error. Anything else leaves the message in place, to be redelivered after
/// the queue's visibility timeout.
pub struct WorkerRunner {
    queue: Arc<dyn JobQueue>,
    pipeline: Arc<dyn ScanPipeline>,
}

impl WorkerRunner {
    pub fn new(queue: Arc<dyn JobQueue>, pipeline: Arc<dyn ScanPipeline>) -> Self {
        Self { queue, pipeline }
    }

    /// Single-pass mode: lease up to `max_messages` once and process them.
    ///
    /// Queue-level errors are fatal for the invocation; per-job failures are
    /// recorded in the summary.
    #[tracing::instrument(skip(self))]
    pub async fn run_single_pass(&self, max_messages: i32) -> Result<WorkerSummary, QueueError> {
        let messages = self.queue.receive(max_messages).await?;

        if messages.is_empty() {
            tracing::debug!("No jobs in queue");
            return Ok(WorkerSummary::from_outcomes(Vec::new(), None));
        }

        tracing::info!(count = messages.len(), "Leased jobs for single-pass run");

        let mut results = Vec::with_capacity(messages.len());
        for message in &messages {
            results.push(self.process_message(message).await);
        }

        Ok(WorkerSummary::from_outcomes(results, None))
    }

    /// Bounded-duration mode: lease one message at a time until `max_jobs`
    /// jobs are processed, the wall-clock `timeout` elapses, or the queue
    /// yields nothing.
    ///
    /// The deadline is checked between jobs; an in-flight scan is never
    /// interrupted.
    #[tracing::instrument(skip(self))]
    pub async fn run_bounded(
        &self,
        max_jobs: usize,
        timeout: Duration,
    ) -> Result<WorkerSummary, QueueError> {
        let started = Instant::now();
        let mut results = Vec::new();

        while results.len() < max_jobs && started.elapsed() < timeout {
            let messages = self.queue.receive(1).await?;
            if messages.is_empty() {
                tracing::debug!("No more jobs in queue; stopping early");
                break;
            }
            for message in &messages {
                results.push(self.process_message(message).await);
                if results.len() >= max_jobs {
                    break;
                }
            }
        }

        let summary = WorkerSummary::from_outcomes(results, Some(started.elapsed()));
        tracing::info!(
            processed = summary.processed_jobs,
            successful = summary.successful,
            failed = summary.failed,
            elapsed_ms = summary.time_elapsed_ms,
            "Bounded worker run finished"
        );
        Ok(summary)
    }

    /// One delivery: deserialize, run the pipeline, acknowledge on success.
    async fn process_message(&self, message: &QueueMessage) -> JobOutcome {
        let job: ScanJob = match serde_json::from_str(&message.body) {
            Ok(job) => job,
            Err(e) => {
                // Left unacknowledged: the message is redelivered and fails
                // identically. Bounding that loop needs a dead-letter queue,
                // which is configured on the queue service, not here.
                tracing::warn!(
                    error = %e,
                    body_bytes = message.body.len(),
                    "Malformed job message; leaving for redelivery"
                );
                return JobOutcome {
                    job_id: None,
                    url: None,
                    status: JobStatus::Failed,
                    error: Some(format!("malformed job message: {e}")),
                };
            }
        };

        tracing::info!(job_id = %job.id, url = %job.url, "Processing scan job");

        match self.pipeline.process(&job).await {
            Ok(()) => match self.queue.acknowledge(&message.receipt_handle).await {
                Ok(()) => {
                    tracing::info!(job_id = %job.id, "Completed scan job");
                    JobOutcome {
                        job_id: Some(job.id),
                        url: Some(job.url),
                        status: JobStatus::Completed,
                        error: None,
                    }
                }
                Err(e) => {
                    // Pipeline succeeded but the delete failed: the message
                    // stays leased and is redelivered, so the job counts as
                    // failed for this invocation.
                    tracing::error!(job_id = %job.id, error = %e, "Failed to acknowledge message");
                    JobOutcome {
                        job_id: Some(job.id),
                        url: Some(job.url),
                        status: JobStatus::Failed,
                        error: Some(format!("acknowledge failed: {e}")),
                    }
                }
            },
            Err(e) => {
                tracing::error!(
                    job_id = %job.id,
                    error = %e,
                    "Scan pipeline failed; job left for redelivery"
                );
                JobOutcome {
                    job_id: Some(job.id),
                    url: Some(job.url),
                    status: JobStatus::Failed,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use a11yscan_queue::InMemoryJobQueue;

    struct AlwaysSucceeds;

    #[async_trait]
    impl ScanPipeline for AlwaysSucceeds {
        async fn process(&self, _job: &ScanJob) -> anyhow::Result<()> {
            Ok(())
        }
    }

    /// Fails for any job whose URL contains the given fragment.
    struct FailsFor(&'static str);

    #[async_trait]
    impl ScanPipeline for FailsFor {
        async fn process(&self, job: &ScanJob) -> anyhow::Result<()> {
            if job.url.contains(self.0) {
                Err(anyhow!("scanner could not reach {}", job.url))
            } else {
                Ok(())
            }
        }
    }

    fn job(url: &str) -> ScanJob {
        ScanJob::new("sess", url, "a@b.com", Default::default())
    }

    async fn queue_with(urls: &[&str]) -> Arc<InMemoryJobQueue> {
        let queue = Arc::new(InMemoryJobQueue::new(Duration::from_secs(60)));
        for url in urls {
            queue.enqueue(&job(url)).await.unwrap();
        }
        queue
    }

    #[tokio::test]
    async fn test_single_pass_drains_queue_on_success() {
        let queue = queue_with(&[
            "https://example.com/a",
            "https://example.com/b",
            "https://example.com/c",
        ])
        .await;
        let runner = WorkerRunner::new(queue.clone(), Arc::new(AlwaysSucceeds));

        let summary = runner.run_single_pass(10).await.unwrap();

        assert_eq!(summary.processed_jobs, 3);
        assert_eq!(summary.successful, 3);
        assert_eq!(summary.failed, 0);
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn test_single_pass_on_empty_queue() {
        let queue = queue_with(&[]).await;
        let runner = WorkerRunner::new(queue, Arc::new(AlwaysSucceeds));

        let summary = runner.run_single_pass(10).await.unwrap();
        assert_eq!(summary.processed_jobs, 0);
        assert!(summary.results.is_empty());
    }

    #[tokio::test]
    async fn test_failing_job_does_not_abort_batch_and_stays_queued() {
        let queue = queue_with(&["https://bad.example.com", "https://example.com/ok"]).await;
        let runner = WorkerRunner::new(queue.clone(), Arc::new(FailsFor("bad.example.com")));

        let summary = runner.run_single_pass(10).await.unwrap();

        assert_eq!(summary.processed_jobs, 2);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 1);

        let failed = summary
            .results
            .iter()
            .find(|r| r.status == JobStatus::Failed)
            .unwrap();
        assert_eq!(failed.url.as_deref(), Some("https://bad.example.com"));
        assert!(failed.error.is_some());

        // The failed message is still in the queue (leased, awaiting redelivery)
        assert_eq!(queue.len().await, 1);
    }

    #[tokio::test]
    async fn test_bounded_mode_stops_when_queue_runs_dry() {
        let queue = queue_with(&["https://example.com/a", "https://example.com/b"]).await;
        let runner = WorkerRunner::new(queue.clone(), Arc::new(AlwaysSucceeds));

        let summary = runner
            .run_bounded(5, Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(summary.processed_jobs, 2);
        assert_eq!(summary.successful, 2);
        let elapsed = summary.time_elapsed_ms.expect("bounded mode reports elapsed time");
        assert!(elapsed < 30_000, "must not hang until the timeout");
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn test_bounded_mode_respects_job_count() {
        let queue = queue_with(&[
            "https://example.com/a",
            "https://example.com/b",
            "https://example.com/c",
        ])
        .await;
        let runner = WorkerRunner::new(queue.clone(), Arc::new(AlwaysSucceeds));

        let summary = runner
            .run_bounded(2, Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(summary.processed_jobs, 2);
        assert_eq!(queue.len().await, 1);
    }

    #[tokio::test]
    async fn test_bounded_mode_zero_timeout_processes_nothing() {
        let queue = queue_with(&["https://example.com"]).await;
        let runner = WorkerRunner::new(queue.clone(), Arc::new(AlwaysSucceeds));

        let summary = runner.run_bounded(5, Duration::ZERO).await.unwrap();
        assert_eq!(summary.processed_jobs, 0);
        assert_eq!(queue.len().await, 1);
    }

    #[tokio::test]
    async fn test_malformed_message_is_left_unacknowledged() {
        let queue = Arc::new(InMemoryJobQueue::new(Duration::from_secs(60)));
        queue.push_raw("{not valid json").await;
        let runner = WorkerRunner::new(queue.clone(), Arc::new(AlwaysSucceeds));

        let summary = runner.run_single_pass(10).await.unwrap();

        assert_eq!(summary.processed_jobs, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.results[0].job_id.is_none());
        assert!(summary.results[0]
            .error
            .as_deref()
            .unwrap()
            .contains("malformed"));
        // Still held for redelivery
        assert_eq!(queue.len().await, 1);
    }
}

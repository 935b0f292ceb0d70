//! AWS SQS queue backend.
//!
//! The client is built lazily on first use so that missing configuration
//! (region, queue URL, credentials) surfaces as a `QueueError::NotConfigured`
//! at call time rather than failing startup.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sqs::config::Credentials;
use aws_sdk_sqs::Client;
use tokio::sync::OnceCell;

use a11yscan_core::models::ScanJob;
use a11yscan_core::Config;

use crate::traits::{JobQueue, QueueDiagnostics, QueueError, QueueMessage};

/// SQS receives at most 10 messages per call.
const SQS_MAX_BATCH: i32 = 10;

#[derive(Debug, Clone)]
pub struct SqsQueueConfig {
    pub region: Option<String>,
    pub queue_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Seconds a received message stays invisible to other receivers.
    pub visibility_timeout_secs: i32,
    /// Long-poll wait on receive. 0 = short poll.
    pub wait_time_secs: i32,
}

impl SqsQueueConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            region: config.aws_region.clone(),
            queue_url: config.sqs_queue_url.clone(),
            access_key_id: config.aws_access_key_id.clone(),
            secret_access_key: config.aws_secret_access_key.clone(),
            visibility_timeout_secs: config.queue_visibility_timeout_secs,
            wait_time_secs: config.queue_wait_time_secs,
        }
    }
}

pub struct SqsJobQueue {
    config: SqsQueueConfig,
    client: OnceCell<Client>,
}

impl SqsJobQueue {
    pub fn new(config: SqsQueueConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    fn queue_url(&self) -> Result<&str, QueueError> {
        self.config
            .queue_url
            .as_deref()
            .ok_or_else(|| QueueError::NotConfigured("AWS_SQS_QUEUE_URL is not set".to_string()))
    }

    async fn client(&self) -> Result<&Client, QueueError> {
        self.client
            .get_or_try_init(|| async {
                let region = self.config.region.clone().ok_or_else(|| {
                    QueueError::NotConfigured("AWS_REGION is not set".to_string())
                })?;
                let access_key_id = self.config.access_key_id.clone().ok_or_else(|| {
                    QueueError::NotConfigured("AWS_ACCESS_KEY_ID is not set".to_string())
                })?;
                let secret_access_key = self.config.secret_access_key.clone().ok_or_else(|| {
                    QueueError::NotConfigured("AWS_SECRET_ACCESS_KEY is not set".to_string())
                })?;

                let credentials = Credentials::new(
                    access_key_id,
                    secret_access_key,
                    None,
                    None,
                    "environment",
                );
                let shared_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region))
                    .credentials_provider(credentials)
                    .load()
                    .await;

                Ok(Client::new(&shared_config))
            })
            .await
    }
}

#[async_trait]
impl JobQueue for SqsJobQueue {
    #[tracing::instrument(skip(self, job), fields(job_id = %job.id))]
    async fn enqueue(&self, job: &ScanJob) -> Result<(), QueueError> {
        let queue_url = self.queue_url()?.to_string();
        let client = self.client().await?;
        let body = serde_json::to_string(job)?;

        client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| QueueError::Backend(e.to_string()))?;

        tracing::info!(job_id = %job.id, "Scan job enqueued");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn receive(&self, max_messages: i32) -> Result<Vec<QueueMessage>, QueueError> {
        let queue_url = self.queue_url()?.to_string();
        let client = self.client().await?;

        let output = client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages.clamp(1, SQS_MAX_BATCH))
            .visibility_timeout(self.config.visibility_timeout_secs)
            .wait_time_seconds(self.config.wait_time_secs)
            .send()
            .await
            .map_err(|e| QueueError::Backend(e.to_string()))?;

        let messages = output
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|message| match (message.body, message.receipt_handle) {
                (Some(body), Some(receipt_handle)) => Some(QueueMessage {
                    body,
                    receipt_handle,
                }),
                _ => {
                    tracing::warn!("Dropping SQS message without body or receipt handle");
                    None
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(count = messages.len(), "Leased messages from SQS");
        Ok(messages)
    }

    #[tracing::instrument(skip(self, receipt_handle))]
    async fn acknowledge(&self, receipt_handle: &str) -> Result<(), QueueError> {
        let queue_url = self.queue_url()?.to_string();
        let client = self.client().await?;

        client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| QueueError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn diagnose(&self) -> QueueDiagnostics {
        let mut diagnostics = QueueDiagnostics {
            backend: "sqs".to_string(),
            region_configured: self.config.region.is_some(),
            queue_url_configured: self.config.queue_url.is_some(),
            credentials_configured: self.config.access_key_id.is_some()
                && self.config.secret_access_key.is_some(),
            reachable: false,
            available_queues: Vec::new(),
            error: None,
        };

        let client = match self.client().await {
            Ok(client) => client,
            Err(e) => {
                diagnostics.error = Some(e.to_string());
                return diagnostics;
            }
        };

        match client.list_queues().send().await {
            Ok(output) => {
                diagnostics.reachable = true;
                diagnostics.available_queues = output.queue_urls.unwrap_or_default();
            }
            Err(e) => {
                diagnostics.error = Some(e.to_string());
            }
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> SqsJobQueue {
        SqsJobQueue::new(SqsQueueConfig {
            region: None,
            queue_url: None,
            access_key_id: None,
            secret_access_key: None,
            visibility_timeout_secs: 300,
            wait_time_secs: 0,
        })
    }

    #[tokio::test]
    async fn test_missing_queue_url_surfaces_at_call_time() {
        let queue = unconfigured();
        let job = ScanJob::new("s1", "https://example.com", "a@b.com", Default::default());
        match queue.enqueue(&job).await {
            Err(QueueError::NotConfigured(msg)) => assert!(msg.contains("AWS_SQS_QUEUE_URL")),
            other => panic!("Expected NotConfigured, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_missing_region_surfaces_at_call_time() {
        let queue = SqsJobQueue::new(SqsQueueConfig {
            queue_url: Some("https://sqs.us-east-1.amazonaws.com/123/scan-jobs".to_string()),
            ..unconfigured().config
        });
        match queue.receive(1).await {
            Err(QueueError::NotConfigured(msg)) => assert!(msg.contains("AWS_REGION")),
            other => panic!("Expected NotConfigured, got {:?}", other.map(|m| m.len())),
        }
    }

    #[tokio::test]
    async fn test_diagnose_reports_missing_configuration() {
        let diagnostics = unconfigured().diagnose().await;
        assert!(!diagnostics.region_configured);
        assert!(!diagnostics.queue_url_configured);
        assert!(!diagnostics.credentials_configured);
        assert!(!diagnostics.reachable);
        assert!(diagnostics.error.is_some());
    }
}

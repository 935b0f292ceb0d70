//! Queue backend selection from configuration.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use a11yscan_core::Config;

use crate::memory::InMemoryJobQueue;
use crate::sqs::{SqsJobQueue, SqsQueueConfig};
use crate::traits::JobQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueBackend {
    Sqs,
    Memory,
}

impl FromStr for QueueBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqs" => Ok(QueueBackend::Sqs),
            "memory" => Ok(QueueBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown queue backend: {}", other)),
        }
    }
}

/// Build the configured queue backend. Unknown values fall back to SQS with a
/// warning; SQS configuration itself is validated at call time by the client.
pub fn create_queue(config: &Config) -> Arc<dyn JobQueue> {
    let backend = config
        .queue_backend
        .parse::<QueueBackend>()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to SQS queue backend");
            QueueBackend::Sqs
        });

    match backend {
        QueueBackend::Sqs => Arc::new(SqsJobQueue::new(SqsQueueConfig::from_config(config))),
        QueueBackend::Memory => Arc::new(InMemoryJobQueue::new(Duration::from_secs(
            config.queue_visibility_timeout_secs.max(1) as u64,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("sqs".parse::<QueueBackend>().unwrap(), QueueBackend::Sqs);
        assert_eq!("SQS".parse::<QueueBackend>().unwrap(), QueueBackend::Sqs);
        assert_eq!(
            "memory".parse::<QueueBackend>().unwrap(),
            QueueBackend::Memory
        );
        assert!("redis".parse::<QueueBackend>().is_err());
    }

    #[tokio::test]
    async fn test_memory_backend_from_config() {
        let config = Config {
            queue_backend: "memory".to_string(),
            ..Config::default()
        };
        let queue = create_queue(&config);
        assert_eq!(queue.diagnose().await.backend, "memory");
    }
}

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use axum_test::TestServer;

use a11yscan_api::services::{ScanService, Scanner};
use a11yscan_api::setup::routes::build_router;
use a11yscan_api::state::AppState;
use a11yscan_core::models::{PageResult, ScanJob, ScanOptions, Violation};
use a11yscan_core::Config;
use a11yscan_infra::RateLimiter;
use a11yscan_queue::{InMemoryJobQueue, JobQueue};
use a11yscan_worker::ScanPipeline;

/// Scanner stub: every scan finds one page with two violations.
pub struct StubScanner;

#[async_trait]
impl Scanner for StubScanner {
    async fn scan(&self, url: &str, _options: &ScanOptions) -> anyhow::Result<Vec<PageResult>> {
        Ok(vec![PageResult {
            url: url.to_string(),
            violations: vec![
                Violation {
                    id: "color-contrast".into(),
                    impact: Some("serious".into()),
                    description: "Element has insufficient color contrast".into(),
                    help_url: None,
                    nodes: 2,
                },
                Violation {
                    id: "image-alt".into(),
                    impact: Some("critical".into()),
                    description: "Image is missing alt text".into(),
                    help_url: None,
                    nodes: 1,
                },
            ],
        }])
    }
}

/// Pipeline stub: fails for any job whose URL contains a registered fragment.
pub struct StubPipeline {
    fail_url_fragments: Vec<String>,
}

impl StubPipeline {
    pub fn succeeding() -> Self {
        Self {
            fail_url_fragments: Vec::new(),
        }
    }

    pub fn failing_for(fragment: &str) -> Self {
        Self {
            fail_url_fragments: vec![fragment.to_string()],
        }
    }
}

#[async_trait]
impl ScanPipeline for StubPipeline {
    async fn process(&self, job: &ScanJob) -> anyhow::Result<()> {
        for fragment in &self.fail_url_fragments {
            if job.url.contains(fragment.as_str()) {
                return Err(anyhow!("pipeline refused {}", job.url));
            }
        }
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub queue: Arc<InMemoryJobQueue>,
}

/// Config for tests: in-memory queue, everything else at defaults.
pub fn test_config() -> Config {
    Config {
        queue_backend: "memory".to_string(),
        ..Config::default()
    }
}

/// Assemble the app with an in-memory queue, a stub scanner, and the given
/// worker pipeline.
pub fn setup_test_app(config: Config, pipeline: Arc<dyn ScanPipeline>) -> TestApp {
    let queue = Arc::new(InMemoryJobQueue::new(Duration::from_secs(60)));
    let limiter = Arc::new(RateLimiter::new(config.rate_limit_window_ms));
    let scan = Arc::new(ScanService::new(Arc::new(StubScanner), None));

    let state = Arc::new(AppState {
        config,
        queue: queue.clone(),
        limiter,
        scan,
        pipeline,
    });

    let server = TestServer::new(build_router(state).expect("router")).expect("test server");
    TestApp { server, queue }
}

/// Enqueue a job directly into the test queue.
pub async fn seed_job(queue: &dyn JobQueue, url: &str) -> ScanJob {
    let job = ScanJob::new("sess_test", url, "reports@example.com", Default::default());
    queue.enqueue(&job).await.expect("seed job");
    job
}

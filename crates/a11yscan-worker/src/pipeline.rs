//! Scan pipeline trait
//!
//! The API implements this trait for its scan service. The worker calls
//! `process` for each leased job; the implementation runs the external
//! scanner, builds the report, and emails it.

use anyhow::Result;
use async_trait::async_trait;

use a11yscan_core::models::ScanJob;

/// The scan → report → email pipeline, invoked once per delivered job.
///
/// Implementations must tolerate repeated invocations for the same job:
/// delivery is at-least-once, and a duplicate report email is an accepted
/// trade-off.
#[async_trait]
pub trait ScanPipeline: Send + Sync {
    async fn process(&self, job: &ScanJob) -> Result<()>;
}

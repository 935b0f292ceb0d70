//! The scan service: runs the scanner, summarizes results, and emails the
//! report. Implements [`ScanPipeline`] so the worker can drive it per job.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use a11yscan_core::models::{PageResult, ScanJob, ScanOptions, ScanSummary};
use a11yscan_worker::ScanPipeline;

use crate::services::report;
use crate::services::{ReportMailer, Scanner};

pub struct ScanService {
    scanner: Arc<dyn Scanner>,
    mailer: Option<ReportMailer>,
}

impl ScanService {
    pub fn new(scanner: Arc<dyn Scanner>, mailer: Option<ReportMailer>) -> Self {
        Self { scanner, mailer }
    }

    /// Run the scanner without report delivery (the synchronous endpoint).
    pub async fn scan(&self, url: &str, options: &ScanOptions) -> Result<Vec<PageResult>> {
        self.scanner.scan(url, options).await
    }

    pub fn mailer(&self) -> Option<&ReportMailer> {
        self.mailer.as_ref()
    }
}

#[async_trait]
impl ScanPipeline for ScanService {
    /// scan → summarize → email. Any error leaves the queue message
    /// unacknowledged, so the job is redelivered after the visibility window.
    async fn process(&self, job: &ScanJob) -> Result<()> {
        let results = self
            .scanner
            .scan(&job.url, &job.options)
            .await
            .context("Scan failed")?;

        let summary = ScanSummary::from_results(&job.url, &results);
        let body = report::render_plain_text(&summary, &results);
        let subject = format!(
            "Accessibility report for {} ({} violations)",
            summary.scanned_url, summary.total_violations
        );

        let mailer = self
            .mailer
            .as_ref()
            .ok_or_else(|| anyhow!("SMTP is not configured (set SMTP_HOST and SMTP_FROM)"))?;
        mailer
            .send_report(&job.report_email, &subject, &body)
            .await
            .context("Report email delivery failed")?;

        tracing::info!(
            job_id = %job.id,
            pages = summary.total_pages,
            violations = summary.total_violations,
            "Scan report delivered"
        );
        Ok(())
    }
}

//! Client for the external scan engine.
//!
//! The engine is an opaque collaborator: it takes a target URL plus options
//! and returns per-page violation results. This service talks to it over
//! HTTP; the endpoint is configured via `SCANNER_ENDPOINT` and its absence is
//! surfaced at call time.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use a11yscan_core::models::{PageResult, ScanOptions};
use a11yscan_core::Config;

/// The opaque scan engine seam. The worker pipeline and the synchronous scan
/// endpoint both go through this trait; tests substitute stubs.
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn scan(&self, url: &str, options: &ScanOptions) -> Result<Vec<PageResult>>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanEngineRequest<'a> {
    url: &'a str,
    options: &'a ScanOptions,
}

pub struct HttpScanner {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl HttpScanner {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.scanner_timeout_secs))
            .build()
            .context("Failed to build scanner HTTP client")?;
        Ok(Self {
            client,
            endpoint: config.scanner_endpoint.clone(),
        })
    }
}

#[async_trait]
impl Scanner for HttpScanner {
    #[tracing::instrument(skip(self, options))]
    async fn scan(&self, url: &str, options: &ScanOptions) -> Result<Vec<PageResult>> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| anyhow!("SCANNER_ENDPOINT is not set"))?;

        tracing::info!(target_url = %url, "Dispatching scan to engine");

        let response = self
            .client
            .post(endpoint)
            .json(&ScanEngineRequest { url, options })
            .send()
            .await
            .context("Scan engine request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Scan engine returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            ));
        }

        let results: Vec<PageResult> = response
            .json()
            .await
            .context("Scan engine returned an unreadable result")?;

        tracing::info!(
            target_url = %url,
            pages = results.len(),
            "Scan engine finished"
        );
        Ok(results)
    }
}

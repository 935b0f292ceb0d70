//! Scan result models: the external scanner's per-page output and the
//! aggregate summary used for responses and report emails.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single accessibility violation found on a page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Rule identifier (e.g. "color-contrast")
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
    /// Number of DOM nodes the rule matched
    #[serde(default)]
    pub nodes: usize,
}

/// Per-page violation results, as returned by the scanner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub url: String,
    #[serde(default)]
    pub violations: Vec<Violation>,
}

/// Aggregate counts over a scan's page results.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total_pages: usize,
    pub total_violations: usize,
    pub scanned_url: String,
}

impl ScanSummary {
    pub fn from_results(scanned_url: &str, results: &[PageResult]) -> Self {
        Self {
            total_pages: results.len(),
            total_violations: results.iter().map(|page| page.violations.len()).sum(),
            scanned_url: scanned_url.to_string(),
        }
    }
}

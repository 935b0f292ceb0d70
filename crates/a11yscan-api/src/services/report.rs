//! Plain-text report rendering and report ids.
//!
//! HTML report rendering is handled elsewhere; the queueing core only needs a
//! plain-text summary for the notification email.

use chrono::Utc;

use a11yscan_core::models::{PageResult, ScanSummary};

/// Unique report identifier: sanitized hostname plus a timestamp.
pub fn report_id(scanned_url: &str) -> String {
    let hostname = url::Url::parse(scanned_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());
    let hostname: String = hostname
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let timestamp: String = Utc::now()
        .to_rfc3339()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    format!("{hostname}_{timestamp}")
}

/// Render the plain-text email body for a finished scan.
pub fn render_plain_text(summary: &ScanSummary, results: &[PageResult]) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "Accessibility scan finished for {}\n\n",
        summary.scanned_url
    ));
    body.push_str(&format!("Pages scanned: {}\n", summary.total_pages));
    body.push_str(&format!(
        "Total violations: {}\n\n",
        summary.total_violations
    ));

    for page in results {
        body.push_str(&format!(
            "{} - {} violation(s)\n",
            page.url,
            page.violations.len()
        ));
        for violation in &page.violations {
            body.push_str(&format!(
                "  [{}] {}: {}\n",
                violation.impact.as_deref().unwrap_or("unknown"),
                violation.id,
                violation.description
            ));
        }
    }

    body
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Informational job status. The queue's visibility/deletion mechanics are the
/// actual source of truth for a job's lifecycle; this field is carried for
/// reporting only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid job status: {}", s)),
        }
    }
}

/// Scanner configuration passed through unmodified to the external scan
/// engine. Recognized keys are typed; everything else is carried in `extra`.
///
/// May contain site credentials; the `Debug` impl redacts them and they must
/// never be logged in cleartext.
#[derive(Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wcag_level: Option<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl std::fmt::Debug for ScanOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ScanOptions")
            .field(
                "auth_email",
                &self.auth_email.as_deref().map(|_| "(provided)"),
            )
            .field(
                "auth_password",
                &self.auth_password.as_deref().map(|_| "[redacted]"),
            )
            .field("max_pages", &self.max_pages)
            .field("wcag_level", &self.wcag_level)
            .field("extra_keys", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The unit of work: one accessibility scan of one target URL, with the
/// address the finished report is emailed to.
///
/// Immutable once enqueued. The worker never mutates a job in place; it
/// either deletes the carrying message (success) or leaves it untouched for
/// redelivery (failure).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanJob {
    pub id: String,
    pub session_id: String,
    pub url: String,
    pub report_email: String,
    #[serde(default)]
    pub options: ScanOptions,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl ScanJob {
    /// Build a new queued job with a fresh timestamp-derived id.
    pub fn new(
        session_id: impl Into<String>,
        url: impl Into<String>,
        report_email: impl Into<String>,
        options: ScanOptions,
    ) -> Self {
        let now = Utc::now();
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("scan_{}_{}", now.timestamp_millis(), &suffix[..8]),
            session_id: session_id.into(),
            url: url.into(),
            report_email: report_email.into(),
            options,
            status: JobStatus::Queued,
            created_at: now,
        }
    }
}

//! Error types module
//!
//! This module provides the core error types used throughout the a11yscan
//! application. All errors are unified under the `AppError` enum, which covers
//! request validation, rate limiting, queue connectivity, and scan pipeline
//! failures.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like auth failures
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// This trait allows errors to self-describe their HTTP response characteristics.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "QUEUE_UNAVAILABLE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsafe URL: {0}")]
    UnsafeUrl(String),

    #[error("Rate limit exceeded; resets at {reset_at_ms}")]
    RateLimited { reset_at_ms: u64 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Queue unavailable: {0}")]
    QueueUnavailable(String),

    #[error("Malformed job message: {0}")]
    MalformedJob(String),

    #[error("Scan pipeline failed: {0}")]
    PipelineFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable,
/// suggested_action, sensitive, log_level). Reduces duplication in the
/// ErrorMetadata impl; client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, None, false, LogLevel::Debug),
        AppError::UnsafeUrl(_) => (400, "UNSAFE_URL", false, None, false, LogLevel::Warn),
        AppError::RateLimited { .. } => (
            429,
            "RATE_LIMITED",
            true,
            Some("Wait for the rate limit window to reset and retry"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, None, true, LogLevel::Warn),
        AppError::QueueUnavailable(_) => (
            500,
            "QUEUE_UNAVAILABLE",
            true,
            Some("Verify queue credentials, region, and queue URL"),
            true,
            LogLevel::Error,
        ),
        AppError::MalformedJob(_) => (500, "MALFORMED_JOB", false, None, false, LogLevel::Error),
        AppError::PipelineFailure(_) => (
            500,
            "PIPELINE_FAILURE",
            true,
            Some("The job remains queued and is retried after the visibility timeout"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", false, None, true, LogLevel::Error)
        }
    }
}

impl AppError {
    /// Variant name, for structured logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BadRequest",
            AppError::UnsafeUrl(_) => "UnsafeUrl",
            AppError::RateLimited { .. } => "RateLimited",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::QueueUnavailable(_) => "QueueUnavailable",
            AppError::MalformedJob(_) => "MalformedJob",
            AppError::PipelineFailure(_) => "PipelineFailure",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "InternalWithSource",
        }
    }

    /// Full internal message, including dynamic content. Hidden from clients
    /// in production for sensitive variants.
    pub fn detailed_message(&self) -> String {
        self.to_string()
    }

    /// Reset time in unix milliseconds for rate-limited errors.
    pub fn rate_limit_reset_ms(&self) -> Option<u64> {
        match self {
            AppError::RateLimited { reset_at_ms } => Some(*reset_at_ms),
            _ => None,
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::UnsafeUrl(_) => {
                "Invalid URL. Only public HTTP/HTTPS URLs are allowed.".to_string()
            }
            AppError::RateLimited { .. } => {
                "Rate limit exceeded. Please try again later.".to_string()
            }
            AppError::Unauthorized(_) => "Unauthorized. Valid secret required.".to_string(),
            AppError::QueueUnavailable(_) => "Scan queue is unavailable".to_string(),
            AppError::MalformedJob(_) => "Malformed job message".to_string(),
            AppError::PipelineFailure(_) => "Scan processing failed".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` (or types that implement `Into<AppError>`) for errors and `?`
//! so they become `HttpAppError` and render consistently (status, body, logging).

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use a11yscan_core::{AppError, ErrorMetadata, LogLevel};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

/// Troubleshooting checklist attached to queue-connectivity failures. A
/// documentation aid for operators, not a programmatic contract.
const QUEUE_TROUBLESHOOTING: [&str; 4] = [
    "Verify AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY are correct",
    "Check if the AWS credentials have SQS permissions",
    "Confirm AWS_REGION matches your queue region",
    "Verify AWS_SQS_QUEUE_URL is correct",
];

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Wait and retry")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    /// Unix milliseconds at which a rate-limited caller may retry
    #[serde(rename = "resetTime", skip_serializing_if = "Option::is_none")]
    pub reset_time: Option<u64>,
    /// Operator checklist for configuration/connectivity failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub troubleshooting: Option<Vec<String>>,
}

/// Wrapper type for AppError to implement IntoResponse.
/// Necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (type from a11yscan-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<a11yscan_queue::QueueError> for HttpAppError {
    fn from(err: a11yscan_queue::QueueError) -> Self {
        HttpAppError(err.into())
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::BadRequest(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on
/// deserialization failure. Use instead of `Json<T>` for a consistent API
/// error shape on invalid bodies.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

fn troubleshooting_for(error: &AppError) -> Option<Vec<String>> {
    match error {
        AppError::QueueUnavailable(_) => Some(
            QUEUE_TROUBLESHOOTING
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
        _ => None,
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let is_production = is_production_env();

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Always hide details in production; in non-production, only show
        // details for non-sensitive errors.
        let hide_details = is_production || app_error.is_sensitive();
        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            details: (!hide_details).then(|| app_error.detailed_message()),
            error_type: (!hide_details).then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
            reset_time: app_error.rate_limit_reset_ms(),
            troubleshooting: troubleshooting_for(app_error),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_body_carries_reset_time() {
        let err = HttpAppError(AppError::RateLimited {
            reset_at_ms: 1_700_000_123_456,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_queue_unavailable_gets_troubleshooting_checklist() {
        let list = troubleshooting_for(&AppError::QueueUnavailable("boom".into())).unwrap();
        assert_eq!(list.len(), 4);
        assert!(list.iter().any(|s| s.contains("AWS_SQS_QUEUE_URL")));
        assert!(troubleshooting_for(&AppError::BadRequest("x".into())).is_none());
    }

    /// Public error response contract: serialized ErrorResponse has "error",
    /// "code", "recoverable", and optionally "resetTime" / "troubleshooting".
    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse {
            error: "Rate limit exceeded. Please try again later.".to_string(),
            details: None,
            error_type: None,
            code: "RATE_LIMITED".to_string(),
            recoverable: true,
            suggested_action: None,
            reset_time: Some(1_700_000_123_456),
            troubleshooting: None,
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert!(json.get("error").and_then(|v| v.as_str()).is_some());
        assert_eq!(json.get("code").and_then(|v| v.as_str()), Some("RATE_LIMITED"));
        assert_eq!(json.get("recoverable").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(
            json.get("resetTime").and_then(|v| v.as_u64()),
            Some(1_700_000_123_456)
        );
        assert!(json.get("details").is_none());
    }
}

//! Worker endpoint authorization.
//!
//! The worker and diagnostics endpoints are protected by a shared secret,
//! accepted either as `Authorization: Bearer <secret>` or as a `?secret=`
//! query parameter. When `WORKER_SECRET` is unset the endpoints are open;
//! that is a backward-compatibility fallback, not a secure default, and is
//! logged as a warning at startup.

use axum::http::{header, HeaderMap};
use subtle::ConstantTimeEq;

use a11yscan_core::{AppError, Config};

/// Check the caller's shared secret before any messages are leased.
pub fn authorize_worker(
    config: &Config,
    headers: &HeaderMap,
    query_secret: Option<&str>,
) -> Result<(), AppError> {
    let Some(secret) = config.worker_secret.as_deref() else {
        // No secret configured: open access
        return Ok(());
    };

    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if constant_time_compare(token, secret) {
                return Ok(());
            }
        }
    }

    if let Some(candidate) = query_secret {
        if constant_time_compare(candidate, secret) {
            return Ok(());
        }
    }

    Err(AppError::Unauthorized(
        "worker secret missing or invalid".to_string(),
    ))
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

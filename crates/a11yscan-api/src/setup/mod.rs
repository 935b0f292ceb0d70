//! Application setup and initialization
//!
//! All initialization logic lives here rather than in main.rs, so tests can
//! assemble the app with substitute queue backends and pipelines.

pub mod routes;
pub mod server;

use anyhow::Result;
use std::sync::Arc;

use a11yscan_core::Config;
use a11yscan_infra::RateLimiter;

use crate::services::{HttpScanner, ReportMailer, ScanService, Scanner};
use crate::state::AppState;

/// Initialize the entire application with the production wiring.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    if config.worker_secret.is_none() {
        tracing::warn!(
            "WORKER_SECRET is not set; worker endpoints are open (backward-compatibility fallback)"
        );
    }

    let queue = a11yscan_queue::create_queue(&config);
    let limiter = Arc::new(RateLimiter::new(config.rate_limit_window_ms));

    let scanner: Arc<dyn Scanner> = Arc::new(HttpScanner::from_config(&config)?);
    let mailer = ReportMailer::from_config(&config);
    if mailer.is_none() {
        tracing::warn!("SMTP is not configured; report delivery will fail at processing time");
    }
    let scan = Arc::new(ScanService::new(scanner, mailer));

    let state = Arc::new(AppState {
        config,
        queue,
        limiter,
        pipeline: scan.clone(),
        scan,
    });

    let router = routes::build_router(state.clone())?;
    Ok((state, router))
}

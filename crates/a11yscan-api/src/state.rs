//! Application state.
//!
//! Handlers are stateless; everything shared lives here and is injected via
//! axum's `State` extractor. Correctness across instances relies on the
//! queue's delivery semantics, not on anything in this struct. The rate
//! limiter is advisory, process-local state.

use std::sync::Arc;

use a11yscan_core::Config;
use a11yscan_infra::RateLimiter;
use a11yscan_queue::JobQueue;
use a11yscan_worker::ScanPipeline;

use crate::services::ScanService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub queue: Arc<dyn JobQueue>,
    pub limiter: Arc<RateLimiter>,
    /// Synchronous scan + report + mail access (`/scan`, diagnostics).
    pub scan: Arc<ScanService>,
    /// The pipeline the worker endpoints drive. In production this is the
    /// scan service itself; tests inject stubs here.
    pub pipeline: Arc<dyn ScanPipeline>,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}

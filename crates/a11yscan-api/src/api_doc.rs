//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "A11yscan API",
        version = "0.1.0",
        description = "Accessibility-scanning service: queue a scan of a public URL and receive the report by email, or run a scan synchronously. Jobs are delivered at least once; processing is idempotent-by-acceptance (duplicate report emails are possible)."
    ),
    paths(
        handlers::queue_scan::queue_scan,
        handlers::scan::scan,
        handlers::worker::run_single_pass,
        handlers::worker::run_bounded,
        handlers::diagnostics::queue_diagnostics,
        handlers::diagnostics::send_test_email,
    ),
    components(schemas(
        a11yscan_core::models::JobStatus,
        a11yscan_core::models::ScanOptions,
        a11yscan_core::models::PageResult,
        a11yscan_core::models::Violation,
        a11yscan_core::models::ScanSummary,
        a11yscan_queue::QueueDiagnostics,
        a11yscan_worker::JobOutcome,
        error::ErrorResponse,
        handlers::queue_scan::QueueScanRequest,
        handlers::queue_scan::QueueScanResponse,
        handlers::scan::ScanRequest,
        handlers::scan::ScanResponse,
        handlers::worker::WorkerRequest,
        handlers::worker::WorkerResponse,
        handlers::diagnostics::QueueDiagnosticsResponse,
        handlers::diagnostics::TestEmailRequest,
        handlers::diagnostics::TestEmailResponse,
    )),
    tags(
        (name = "scans", description = "Queueing and synchronous scans"),
        (name = "worker", description = "Queue draining endpoints"),
        (name = "diagnostics", description = "Operator diagnostics")
    )
)]
pub struct ApiDoc;

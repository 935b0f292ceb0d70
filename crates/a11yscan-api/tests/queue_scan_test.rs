mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};

use a11yscan_core::models::{JobStatus, ScanJob};
use a11yscan_queue::JobQueue;
use helpers::{setup_test_app, test_config, StubPipeline};

fn app() -> helpers::TestApp {
    setup_test_app(test_config(), Arc::new(StubPipeline::succeeding()))
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let app = app();

    let response = app
        .server
        .post("/queue-scan")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(app.queue.is_empty().await);
}

#[tokio::test]
async fn test_invalid_json_body_is_rejected() {
    let app = app();

    let response = app
        .server
        .post("/queue-scan")
        .content_type("application/json")
        .text("{not json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unsafe_urls_are_rejected_with_distinct_message() {
    let app = app();

    for url in [
        "http://localhost:3000",
        "http://10.0.0.5/admin",
        "http://192.168.1.1",
        "http://169.254.1.1",
        "ftp://example.com",
    ] {
        let response = app
            .server
            .post("/queue-scan")
            .json(&json!({
                "sessionId": "cs_123",
                "url": url,
                "reportEmail": "a@b.com",
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{url}");
        let body: Value = response.json();
        assert_eq!(body["code"], "UNSAFE_URL", "{url}");
        assert_eq!(
            body["error"],
            "Invalid URL. Only public HTTP/HTTPS URLs are allowed."
        );
    }

    assert!(app.queue.is_empty().await);
}

#[tokio::test]
async fn test_successful_enqueue_appends_exactly_one_message() {
    let app = app();

    let response = app
        .server
        .post("/queue-scan")
        .json(&json!({
            "sessionId": "cs_123",
            "url": "https://example.com",
            "reportEmail": "a@b.com",
            "options": { "maxPages": 10, "wcagLevel": "AA" },
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Scan queued successfully");
    let job_id = body["jobId"].as_str().unwrap();
    assert!(job_id.starts_with("scan_"));

    assert_eq!(app.queue.len().await, 1);

    // The queued message deserializes back into the job we submitted
    let messages = app.queue.receive(1).await.unwrap();
    let job: ScanJob = serde_json::from_str(&messages[0].body).unwrap();
    assert_eq!(job.id, job_id);
    assert_eq!(job.session_id, "cs_123");
    assert_eq!(job.url, "https://example.com");
    assert_eq!(job.report_email, "a@b.com");
    assert_eq!(job.status, JobStatus::Queued);
    assert_eq!(job.options.max_pages, Some(10));
}

#[tokio::test]
async fn test_enqueue_is_rate_limited_per_client() {
    let config = a11yscan_core::Config {
        enqueue_rate_limit: 2,
        ..test_config()
    };
    let app = setup_test_app(config, Arc::new(StubPipeline::succeeding()));

    let request = json!({
        "sessionId": "cs_123",
        "url": "https://example.com",
        "reportEmail": "a@b.com",
    });

    for _ in 0..2 {
        let response = app
            .server
            .post("/queue-scan")
            .add_header("x-forwarded-for", "203.0.113.9")
            .json(&request)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    let denied = app
        .server
        .post("/queue-scan")
        .add_header("x-forwarded-for", "203.0.113.9")
        .json(&request)
        .await;

    assert_eq!(denied.status_code(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = denied.json();
    assert_eq!(body["code"], "RATE_LIMITED");
    assert!(body["resetTime"].as_u64().unwrap() > 0);

    // A different client is unaffected
    let other = app
        .server
        .post("/queue-scan")
        .add_header("x-forwarded-for", "198.51.100.7")
        .json(&request)
        .await;
    assert_eq!(other.status_code(), StatusCode::OK);
}

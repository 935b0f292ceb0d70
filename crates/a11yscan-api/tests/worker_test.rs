mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};

use a11yscan_core::Config;
use helpers::{seed_job, setup_test_app, test_config, StubPipeline};

fn secured_config() -> Config {
    Config {
        worker_secret: Some("test-worker-secret".to_string()),
        ..test_config()
    }
}

#[tokio::test]
async fn test_worker_requires_secret_when_configured() {
    let app = setup_test_app(secured_config(), Arc::new(StubPipeline::succeeding()));

    let response = app.server.get("/worker").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unauthorized. Valid secret required.");

    let response = app
        .server
        .get("/worker")
        .add_header("Authorization", "Bearer wrong-secret")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_worker_accepts_bearer_token_and_query_secret() {
    let app = setup_test_app(secured_config(), Arc::new(StubPipeline::succeeding()));

    let response = app
        .server
        .get("/worker")
        .add_header("Authorization", "Bearer test-worker-secret")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.server.get("/worker?secret=test-worker-secret").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_worker_is_open_when_no_secret_configured() {
    let app = setup_test_app(test_config(), Arc::new(StubPipeline::succeeding()));

    let response = app.server.get("/worker").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "No jobs in queue");
    assert_eq!(body["processedJobs"], 0);
}

#[tokio::test]
async fn test_single_pass_processes_all_leased_jobs() {
    let app = setup_test_app(test_config(), Arc::new(StubPipeline::succeeding()));

    for path in ["a", "b", "c"] {
        seed_job(app.queue.as_ref(), &format!("https://example.com/{path}")).await;
    }

    let response = app.server.get("/worker").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["processedJobs"], 3);
    assert_eq!(body["successful"], 3);
    assert_eq!(body["failed"], 0);
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
    assert_eq!(body["results"][0]["status"], "completed");

    // Every message acknowledged: queue drained
    assert!(app.queue.is_empty().await);
}

#[tokio::test]
async fn test_failing_job_is_isolated_and_left_for_redelivery() {
    let app = setup_test_app(test_config(), Arc::new(StubPipeline::failing_for("bad")));

    let failing = seed_job(app.queue.as_ref(), "https://bad.example.com").await;
    seed_job(app.queue.as_ref(), "https://example.com/fine").await;

    let response = app.server.get("/worker").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["processedJobs"], 2);
    assert_eq!(body["successful"], 1);
    assert_eq!(body["failed"], 1);

    let results = body["results"].as_array().unwrap();
    let failed = results
        .iter()
        .find(|r| r["status"] == "failed")
        .expect("one failed result");
    assert_eq!(failed["jobId"], failing.id.as_str());
    assert!(failed["error"].as_str().unwrap().contains("pipeline refused"));

    // The failed message stays queued for redelivery; the other was deleted
    assert_eq!(app.queue.len().await, 1);
}

#[tokio::test]
async fn test_bounded_mode_terminates_early_when_queue_is_empty() {
    let app = setup_test_app(test_config(), Arc::new(StubPipeline::succeeding()));

    seed_job(app.queue.as_ref(), "https://example.com/1").await;
    seed_job(app.queue.as_ref(), "https://example.com/2").await;

    let response = app
        .server
        .post("/worker")
        .json(&json!({ "maxJobs": 5, "timeout": 30000 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["message"], "Worker completed");
    assert_eq!(body["processedJobs"], 2);
    let elapsed = body["timeElapsed"].as_u64().unwrap();
    assert!(elapsed < 30_000, "must not hang until the timeout");
    assert!(app.queue.is_empty().await);
}

#[tokio::test]
async fn test_bounded_mode_without_body_uses_defaults() {
    let app = setup_test_app(test_config(), Arc::new(StubPipeline::succeeding()));

    seed_job(app.queue.as_ref(), "https://example.com/1").await;
    seed_job(app.queue.as_ref(), "https://example.com/2").await;

    // Default is one job per invocation
    let response = app.server.post("/worker").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["processedJobs"], 1);
    assert_eq!(app.queue.len().await, 1);
}

#[tokio::test]
async fn test_malformed_message_reported_failed_and_not_deleted() {
    let app = setup_test_app(test_config(), Arc::new(StubPipeline::succeeding()));

    app.queue.push_raw("this is not a scan job").await;

    let response = app.server.get("/worker").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["processedJobs"], 1);
    assert_eq!(body["failed"], 1);
    assert!(body["results"][0]["jobId"].is_null());

    assert_eq!(app.queue.len().await, 1);
}

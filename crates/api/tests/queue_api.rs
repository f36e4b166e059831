//! Integration tests for the queue observability and job submission routes.

mod common;

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use common::{body_json, get, post};

// ---------------------------------------------------------------------------
// Test: GET /api/v1/workers returns one entry per worker in id order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn workers_endpoint_lists_every_worker_in_id_order() {
    let queue = common::started_queue(3);

    // Allow all workers to reach readiness before sampling.
    let deadline = Instant::now() + Duration::from_secs(5);
    while queue.status().ready_workers < 3 {
        assert!(Instant::now() < deadline, "workers never became ready");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let app = common::build_test_app(queue);
    let response = get(app, "/api/v1/workers").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let workers = json.as_array().expect("workers must be a JSON array");
    assert_eq!(workers.len(), 3);
    for (expected_id, worker) in workers.iter().enumerate() {
        assert_eq!(worker["worker-id"], expected_id);
        assert_eq!(worker["state"], "pending");
        assert!(worker.get("job-id").is_none());
    }
}

// ---------------------------------------------------------------------------
// Test: GET /api/v1/status reports the queue aggregate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_endpoint_reports_queue_aggregate() {
    let queue = common::started_queue(2);

    let deadline = Instant::now() + Duration::from_secs(5);
    while queue.status().ready_workers < 2 {
        assert!(Instant::now() < deadline, "workers never became ready");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let app = common::build_test_app(queue);
    let response = get(app, "/api/v1/status").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let status = &json["queue-status"];
    assert_eq!(status["total-workers"], 2);
    assert_eq!(status["active-workers"], 0);
    assert_eq!(status["ready-workers"], 2);
}

// ---------------------------------------------------------------------------
// Test: POST /api/v1/jobs/test submits the demo job
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submitting_test_job_returns_job_and_worker_recovers() {
    let queue = common::started_queue(1);

    let app = common::build_test_app(queue.clone());
    let response = post(app, "/api/v1/jobs/test").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "test");
    assert!(json["id"].is_string(), "job id must be a string");

    // The demo job panics; the worker must recover and return to the ready
    // pool instead of dying with it. Give the job time to run, then check
    // the lone worker is ready again and the pool still accepts work.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let deadline = Instant::now() + Duration::from_secs(5);
    while queue.status().ready_workers < 1 {
        assert!(
            Instant::now() < deadline,
            "worker never recovered from the demo job"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let app = common::build_test_app(queue);
    let response = post(app, "/api/v1/jobs/test").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: submission after queue stop returns 503
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submitting_after_stop_returns_service_unavailable() {
    let queue = common::started_queue(1);
    queue.stop().await.expect("queue must stop cleanly");

    let app = common::build_test_app(queue);
    let response = post(app, "/api/v1/jobs/test").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["code"], "QUEUE_UNAVAILABLE");
}

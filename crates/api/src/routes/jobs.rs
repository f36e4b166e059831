//! Route definitions for the `/jobs` resource.

use axum::extract::State;
use axum::{routing::post, Json, Router};

use crate::error::AppResult;
use crate::jobs::TestJob;
use crate::state::AppState;

/// POST /test -- submit the demo job and echo it back.
///
/// Submission is fire-and-forget: the job's outcome is visible only through
/// logs and the `/workers` / `/status` endpoints. The demo job fails on
/// purpose, so submitting it exercises the panic-recovery path.
async fn submit_test_job(State(state): State<AppState>) -> AppResult<Json<TestJob>> {
    let job = TestJob::new("test");
    state.queue.submit(Box::new(job.clone())).await?;
    Ok(Json(job))
}

/// Routes mounted at `/jobs`.
pub fn router() -> Router<AppState> {
    Router::new().route("/test", post(submit_test_job))
}

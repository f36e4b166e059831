use axum::extract::State;
use axum::{routing::get, Json, Router};
use jobd_queue::QueueStatus;
use serde::Serialize;

use crate::state::AppState;

/// Status response payload.
#[derive(Serialize)]
pub struct StatusResponse {
    /// Point-in-time queue aggregate. Racy by design; counts may be
    /// transiently inconsistent across workers.
    #[serde(rename = "queue-status")]
    pub queue_status: QueueStatus,
}

/// GET /status -- returns the queue-level worker counts.
async fn queue_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        queue_status: state.queue.status(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(queue_status))
}

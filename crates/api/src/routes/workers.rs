use axum::extract::State;
use axum::{routing::get, Json, Router};
use jobd_queue::WorkerState;

use crate::state::AppState;

/// GET /workers -- one state snapshot per worker, ordered by worker id.
///
/// Snapshots are taken independently per worker, so the list is not a single
/// atomic view of the pool.
async fn worker_states(State(state): State<AppState>) -> Json<Vec<WorkerState>> {
    Json(state.queue.worker_states())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/workers", get(worker_states))
}

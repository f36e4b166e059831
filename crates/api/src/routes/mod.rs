pub mod health;
pub mod jobs;
pub mod status;
pub mod workers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /status          queue-level aggregate (GET)
/// /workers         per-worker state snapshots (GET)
/// /jobs/test       submit the demo job (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(status::router())
        .merge(workers::router())
        .nest("/jobs", jobs::router())
}

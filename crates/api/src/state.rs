use std::sync::Arc;

use jobd_queue::JobQueue;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The background job queue. Started before the router is built,
    /// stopped after the HTTP listener has drained.
    pub queue: Arc<JobQueue>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

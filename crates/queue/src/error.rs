use std::time::Duration;

/// Errors produced by [`JobQueue`](crate::JobQueue) operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The queue was constructed with a worker count of zero.
    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    /// An operation that requires a running dispatcher was called before
    /// `start` (or after a failed start).
    #[error("queue is not running")]
    NotStarted,

    /// The queue has been stopped; no further jobs are accepted.
    #[error("queue is stopped and no longer accepts jobs")]
    Closed,

    /// Not all workers reported stopped within the configured shutdown
    /// timeout. This indicates a stuck job or a lost stop signal; the
    /// hosting process must treat it as fatal and terminate.
    #[error("workers did not stop within {timeout:?}; a job is stuck or a stop signal was lost")]
    ShutdownTimeout {
        /// The configured shutdown timeout that elapsed.
        timeout: Duration,
    },

    /// The dispatcher task itself failed (panicked or was aborted). Like
    /// [`QueueError::ShutdownTimeout`], this leaves the pool in a state
    /// that cannot be reasoned about and must be treated as fatal.
    #[error("dispatcher task failed: {0}")]
    Dispatcher(String),
}

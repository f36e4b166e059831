//! State-annotated logging sink handed to workers and jobs.

use crate::state::WorkerState;

/// A logging sink bound to one worker-state snapshot.
///
/// Every record emitted through a `WorkerLog` carries the worker id, phase,
/// and associated job id of the snapshot it was created from, so log lines
/// from concurrent workers can be told apart and correlated with
/// [`worker_states`](crate::JobQueue::worker_states) output.
///
/// Workers mint a fresh `WorkerLog` on each state transition and pass it to
/// [`Job::process`](crate::Job::process) /
/// [`Job::on_error`](crate::Job::on_error); there is no process-wide mutable
/// logger state.
#[derive(Debug, Clone)]
pub struct WorkerLog {
    state: WorkerState,
}

impl WorkerLog {
    pub(crate) fn new(state: WorkerState) -> Self {
        Self { state }
    }

    /// The worker-state snapshot this sink is bound to.
    pub fn state(&self) -> &WorkerState {
        &self.state
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!(
            worker_id = self.state.id,
            state = %self.state.phase,
            job_id = ?self.state.job_id,
            "{message}"
        );
    }

    pub fn info(&self, message: &str) {
        tracing::info!(
            worker_id = self.state.id,
            state = %self.state.phase,
            job_id = ?self.state.job_id,
            "{message}"
        );
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(
            worker_id = self.state.id,
            state = %self.state.phase,
            job_id = ?self.state.job_id,
            "{message}"
        );
    }

    pub fn error(&self, message: &str) {
        tracing::error!(
            worker_id = self.state.id,
            state = %self.state.phase,
            job_id = ?self.state.job_id,
            "{message}"
        );
    }
}

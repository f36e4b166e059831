//! Worker state snapshots and the queue-level status aggregate.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// WorkerPhase
// ---------------------------------------------------------------------------

/// Lifecycle phase of a single worker.
///
/// Transitions are monotonic within one job's lifecycle:
/// `Pending -> Processing -> Processed -> Pending`, or `Pending -> Stopping`
/// (terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerPhase {
    /// Constructed, not yet started.
    Initialized,
    /// `start` has been called; the worker task is entering its loop.
    Starting,
    /// Idle and advertised in the ready pool, waiting for a job or a stop
    /// signal.
    Pending,
    /// Executing a job.
    Processing,
    /// Finished a job (successfully or after a recovered panic).
    Processed,
    /// Told to stop; the worker task has terminated. Terminal.
    Stopping,
}

impl WorkerPhase {
    /// The lowercase wire name of the phase, matching its JSON encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerPhase::Initialized => "initialized",
            WorkerPhase::Starting => "starting",
            WorkerPhase::Pending => "pending",
            WorkerPhase::Processing => "processing",
            WorkerPhase::Processed => "processed",
            WorkerPhase::Stopping => "stopping",
        }
    }
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WorkerState
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of one worker.
///
/// Written only by the owning worker task, always replaced as a whole value,
/// so concurrent readers never observe a partially-updated combination of
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerState {
    /// Worker identifier, assigned at pool construction (`0..N-1`).
    #[serde(rename = "worker-id")]
    pub id: usize,

    /// Current lifecycle phase.
    #[serde(rename = "state")]
    pub phase: WorkerPhase,

    /// Identifier of the job currently or most recently associated with the
    /// worker. `None` when the worker has not handled a job yet.
    #[serde(rename = "job-id", skip_serializing_if = "Option::is_none", default)]
    pub job_id: Option<Uuid>,
}

impl WorkerState {
    pub(crate) fn new(id: usize) -> Self {
        Self {
            id,
            phase: WorkerPhase::Initialized,
            job_id: None,
        }
    }

    /// Whether the worker is occupied with a job (`Processing` or
    /// `Processed`).
    pub fn is_active(&self) -> bool {
        matches!(self.phase, WorkerPhase::Processing | WorkerPhase::Processed)
    }

    /// Whether the worker is idle and waiting for work (`Pending`).
    pub fn is_ready(&self) -> bool {
        self.phase == WorkerPhase::Pending
    }
}

// ---------------------------------------------------------------------------
// QueueStatus
// ---------------------------------------------------------------------------

/// Point-in-time aggregate over the worker pool.
///
/// Each worker's state is sampled independently, so the counts may be
/// transiently inconsistent across workers. This is a cheap observability
/// signal, not a consistency-critical count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    /// Size of the pool, fixed at construction.
    #[serde(rename = "total-workers")]
    pub total_workers: usize,

    /// Workers whose last-known phase is `Processing` or `Processed`.
    #[serde(rename = "active-workers")]
    pub active_workers: usize,

    /// Workers whose last-known phase is `Pending`.
    #[serde(rename = "ready-workers")]
    pub ready_workers: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

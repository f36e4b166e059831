//! Background job-processing core.
//!
//! A [`JobQueue`] owns a fixed-size pool of workers, each running on its own
//! tokio task. Submitted jobs are matched to idle workers in arrival order
//! through a ready-pool rendezvous: every worker advertises its private
//! single-slot assignment channel when it has nothing to do, and the
//! dispatcher hands each incoming job to the next advertised channel.
//!
//! Jobs implement the [`Job`] trait. A panic inside [`Job::process`] is
//! caught by the owning worker, reported through [`Job::on_error`], and never
//! propagates to the dispatcher or to other workers.
//!
//! Per-worker state is published as whole-value snapshots and can be read at
//! any time via [`JobQueue::worker_states`] and [`JobQueue::status`] without
//! blocking the workers.

pub mod error;
pub mod job;
pub mod log;
pub mod queue;
pub mod state;

mod worker;

pub use error::QueueError;
pub use job::{panic_message, Job, PanicPayload};
pub use log::WorkerLog;
pub use queue::JobQueue;
pub use state::{QueueStatus, WorkerPhase, WorkerState};

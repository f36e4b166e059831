//! A single worker: one tokio task with an explicit lifecycle state machine.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::job::{panic_message, Job};
use crate::log::WorkerLog;
use crate::state::{WorkerPhase, WorkerState};

/// A job in transit, owned by exactly one worker at a time.
pub(crate) type BoxedJob = Box<dyn Job>;

/// The sending half of a worker's private assignment channel. Advertised in
/// the ready pool whenever the worker is idle.
pub(crate) type AssignmentSender = mpsc::Sender<BoxedJob>;

/// The result of one readiness iteration: either a job arrived or the stop
/// signal fired.
enum Wakeup {
    Assigned(Option<BoxedJob>),
    Stop,
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// The write side of a worker: consumed by [`Worker::spawn`], after which the
/// worker lives on its own task until stopped.
#[derive(Debug)]
pub(crate) struct Worker {
    id: usize,
    state_tx: watch::Sender<WorkerState>,
    ready_pool: mpsc::Sender<AssignmentSender>,
    assignment_tx: AssignmentSender,
    assignment_rx: mpsc::Receiver<BoxedJob>,
    cancel: CancellationToken,
}

/// The read side kept by the queue: the state snapshot channel and the stop
/// signal for one worker.
#[derive(Debug)]
pub(crate) struct WorkerMonitor {
    pub(crate) state_rx: watch::Receiver<WorkerState>,
    pub(crate) cancel: CancellationToken,
}

impl Worker {
    /// Build a worker and its monitor. The worker does not run until
    /// [`Worker::spawn`] is called.
    pub(crate) fn new(
        id: usize,
        ready_pool: mpsc::Sender<AssignmentSender>,
    ) -> (Self, WorkerMonitor) {
        let (state_tx, state_rx) = watch::channel(WorkerState::new(id));
        // Single-slot assignment channel, reused across iterations.
        let (assignment_tx, assignment_rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();

        let worker = Self {
            id,
            state_tx,
            ready_pool,
            assignment_tx,
            assignment_rx,
            cancel: cancel.clone(),
        };
        let monitor = WorkerMonitor { state_rx, cancel };
        (worker, monitor)
    }

    /// Launch the worker's task. One worker has exactly one lifetime; the
    /// returned handle resolves when the worker has fully stopped.
    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        self.set_phase(WorkerPhase::Starting, None)
            .info("worker starting");

        loop {
            // Advertise availability: check the assignment slot into the
            // ready pool. Fails only when the queue side is gone.
            if self
                .ready_pool
                .send(self.assignment_tx.clone())
                .await
                .is_err()
            {
                break;
            }

            self.set_phase(WorkerPhase::Pending, None)
                .info("worker waiting for jobs");

            let wakeup = tokio::select! {
                maybe_job = self.assignment_rx.recv() => Wakeup::Assigned(maybe_job),
                () = self.cancel.cancelled() => Wakeup::Stop,
            };

            match wakeup {
                Wakeup::Assigned(Some(job)) => self.run_job(job).await,
                // Assignment channel closed: the queue is gone, nothing left
                // to wait for.
                Wakeup::Assigned(None) => break,
                Wakeup::Stop => break,
            }
        }

        self.set_phase(WorkerPhase::Stopping, None)
            .info("worker stopping");
    }

    /// Execute one job, converting a panic inside `process` into an
    /// `on_error` call. The panic never propagates past this method.
    async fn run_job(&self, job: BoxedJob) {
        let job_id = job.id();

        let log = self.set_phase(WorkerPhase::Processing, Some(job_id));
        log.info("worker processing job");

        let result = AssertUnwindSafe(job.process(&log)).catch_unwind().await;

        let log = self.set_phase(WorkerPhase::Processed, Some(job_id));
        match result {
            Ok(()) => log.info("worker processed job"),
            Err(payload) => {
                let message = format!(
                    "panicked while processing job: \"{}\"",
                    panic_message(&payload)
                );
                job.on_error(&log, payload).await;
                log.error(&message);
            }
        }
    }

    /// Replace the published state snapshot as a whole value and return a
    /// logging sink bound to it.
    fn set_phase(&self, phase: WorkerPhase, job_id: Option<Uuid>) -> WorkerLog {
        let state = WorkerState {
            id: self.id,
            phase,
            job_id,
        };
        self.state_tx.send_replace(state.clone());
        WorkerLog::new(state)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

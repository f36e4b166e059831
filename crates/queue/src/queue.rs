//! The job queue: worker pool ownership, dispatch, and bounded shutdown.

use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::QueueError;
use crate::job::Job;
use crate::state::{QueueStatus, WorkerState};
use crate::worker::{AssignmentSender, BoxedJob, Worker, WorkerMonitor};

// ---------------------------------------------------------------------------
// JobQueue
// ---------------------------------------------------------------------------

/// A bounded pool of workers fed by a single dispatcher.
///
/// Lifecycle: [`JobQueue::new`] -> [`JobQueue::start`] (once) ->
/// [`JobQueue::submit`] any number of times -> [`JobQueue::stop`] (once).
///
/// Submissions are dequeued in arrival order (FIFO at the dispatcher
/// boundary); completion order and worker selection carry no guarantee.
#[derive(Debug)]
pub struct JobQueue {
    shutdown_timeout: Duration,
    submit_tx: mpsc::Sender<BoxedJob>,
    /// Taken by `start`; `Some` means the queue has not been started yet.
    submit_rx: Option<mpsc::Receiver<BoxedJob>>,
    /// Taken by `start`.
    ready_rx: Option<mpsc::Receiver<AssignmentSender>>,
    /// Drained by `start` when the worker tasks are spawned.
    workers: Vec<Worker>,
    /// Read-side handles, ordered by worker id. Lives for the pool's
    /// lifetime.
    monitors: Vec<WorkerMonitor>,
    shutdown: CancellationToken,
    dispatcher: Mutex<Option<JoinHandle<Result<(), QueueError>>>>,
}

impl JobQueue {
    /// Build a queue with `workers` workers (ids `0..workers`) and the given
    /// shutdown timeout.
    ///
    /// Nothing runs until [`JobQueue::start`] is called. Fails with
    /// [`QueueError::InvalidWorkerCount`] when `workers` is zero.
    pub fn new(workers: usize, shutdown_timeout: Duration) -> Result<Self, QueueError> {
        if workers == 0 {
            return Err(QueueError::InvalidWorkerCount(workers));
        }

        // The ready pool holds at most one advertisement per worker.
        let (ready_tx, ready_rx) = mpsc::channel(workers);
        // Capacity 1: `submit` rendezvouses with the dispatcher, it does not
        // buffer a backlog.
        let (submit_tx, submit_rx) = mpsc::channel(1);

        let mut pool = Vec::with_capacity(workers);
        let mut monitors = Vec::with_capacity(workers);
        for id in 0..workers {
            tracing::debug!(worker_id = id, "initializing worker");
            let (worker, monitor) = Worker::new(id, ready_tx.clone());
            pool.push(worker);
            monitors.push(monitor);
        }

        Ok(Self {
            shutdown_timeout,
            submit_tx,
            submit_rx: Some(submit_rx),
            ready_rx: Some(ready_rx),
            workers: pool,
            monitors,
            shutdown: CancellationToken::new(),
            dispatcher: Mutex::new(None),
        })
    }

    /// Spawn all worker tasks, then the dispatcher task.
    ///
    /// Intended to be called exactly once; a second call finds the worker
    /// set already drained, warns, and does nothing.
    pub fn start(&mut self) {
        let (Some(submit_rx), Some(ready_rx)) = (self.submit_rx.take(), self.ready_rx.take())
        else {
            tracing::warn!("queue already started");
            return;
        };

        let worker_handles: Vec<JoinHandle<()>> =
            self.workers.drain(..).map(Worker::spawn).collect();
        let worker_cancels: Vec<CancellationToken> =
            self.monitors.iter().map(|m| m.cancel.clone()).collect();

        let dispatcher = Dispatcher {
            submit_rx,
            ready_rx,
            worker_handles,
            worker_cancels,
            shutdown: self.shutdown.clone(),
            shutdown_timeout: self.shutdown_timeout,
        };
        *self.dispatcher.get_mut() = Some(tokio::spawn(dispatcher.run()));

        tracing::info!(workers = self.monitors.len(), "queue started");
    }

    /// Hand a job to the pool.
    ///
    /// Suspends until the job enters the single-slot hand-off to the
    /// dispatcher; in practice this is near-instant unless all workers are
    /// busy and a previous submission is still waiting to be dispatched.
    /// At most one accepted submission may sit in that slot before a worker
    /// picks it up, and it is dropped if [`JobQueue::stop`] begins first.
    /// Do not submit after `stop` has been called: once the dispatcher has
    /// terminated this returns [`QueueError::Closed`].
    pub async fn submit(&self, job: Box<dyn Job>) -> Result<(), QueueError> {
        if self.submit_rx.is_some() {
            return Err(QueueError::NotStarted);
        }
        self.submit_tx
            .send(job)
            .await
            .map_err(|_| QueueError::Closed)
    }

    /// Stop the pool: signal the dispatcher, which stops every worker and
    /// waits (bounded by the shutdown timeout) for all of them to terminate.
    ///
    /// Returns once the dispatcher has fully terminated.
    /// [`QueueError::ShutdownTimeout`] means a worker failed to stop in
    /// time; the hosting process must treat that as an unrecoverable
    /// invariant violation and exit.
    pub async fn stop(&self) -> Result<(), QueueError> {
        let handle = self
            .dispatcher
            .lock()
            .await
            .take()
            .ok_or(QueueError::NotStarted)?;

        tracing::info!("queue stop requested");
        self.shutdown.cancel();

        match handle.await {
            Ok(result) => {
                if result.is_ok() {
                    tracing::info!("queue stopped");
                }
                result
            }
            Err(join_error) => Err(QueueError::Dispatcher(join_error.to_string())),
        }
    }

    /// One state snapshot per worker, ordered by worker id.
    ///
    /// Snapshots are taken independently per worker; the sequence is not a
    /// single atomic multi-worker snapshot.
    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.monitors
            .iter()
            .map(|m| m.state_rx.borrow().clone())
            .collect()
    }

    /// Point-in-time counts over the pool. Racy by design.
    pub fn status(&self) -> QueueStatus {
        let states = self.worker_states();
        QueueStatus {
            total_workers: states.len(),
            active_workers: states.iter().filter(|s| s.is_active()).count(),
            ready_workers: states.iter().filter(|s| s.is_ready()).count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// What woke the dispatcher up on one iteration.
enum Step {
    Submitted(Option<BoxedJob>),
    Shutdown,
}

/// The single dispatcher task: matches submissions to idle workers and
/// coordinates shutdown. Exactly one exists per started queue.
struct Dispatcher {
    submit_rx: mpsc::Receiver<BoxedJob>,
    ready_rx: mpsc::Receiver<AssignmentSender>,
    worker_handles: Vec<JoinHandle<()>>,
    worker_cancels: Vec<CancellationToken>,
    shutdown: CancellationToken,
    shutdown_timeout: Duration,
}

impl Dispatcher {
    async fn run(mut self) -> Result<(), QueueError> {
        tracing::debug!("dispatcher running");

        loop {
            let step = tokio::select! {
                maybe_job = self.submit_rx.recv() => Step::Submitted(maybe_job),
                () = self.shutdown.cancelled() => Step::Shutdown,
            };

            match step {
                Step::Submitted(Some(job)) => {
                    if !self.dispatch(job).await {
                        break;
                    }
                }
                // All queue handles dropped without `stop`: drain the
                // workers as if stopped.
                Step::Submitted(None) => break,
                Step::Shutdown => break,
            }
        }

        self.stop_workers().await
    }

    /// Hand one job to the next idle worker, blocking until a worker
    /// advertises availability or shutdown is requested. This rendezvous
    /// enforces one job per worker and provides natural back-pressure.
    ///
    /// Returns `false` when shutdown interrupted the wait: the in-hand job
    /// is dropped (submitting during stop is documented caller misuse) and
    /// the caller must fall through to stopping the workers, so the
    /// shutdown timeout still bounds the wait even when every worker is
    /// stuck.
    async fn dispatch(&mut self, job: BoxedJob) -> bool {
        let job_id = job.id();

        let slot = tokio::select! {
            maybe_slot = self.ready_rx.recv() => maybe_slot,
            () = self.shutdown.cancelled() => {
                tracing::warn!(
                    job_id = %job_id,
                    "shutdown requested while waiting for an idle worker, job dropped"
                );
                return false;
            }
        };

        match slot {
            Some(slot) => {
                tracing::debug!(job_id = %job_id, "dispatching job");
                if slot.send(job).await.is_err() {
                    // Only reachable if the worker task died outside the
                    // stop protocol.
                    tracing::error!(job_id = %job_id, "assignment channel closed, job dropped");
                }
                true
            }
            None => {
                tracing::error!(job_id = %job_id, "ready pool closed, job dropped");
                true
            }
        }
    }

    /// Stop every worker and wait, bounded by the shutdown timeout, for all
    /// of them to terminate.
    async fn stop_workers(self) -> Result<(), QueueError> {
        tracing::info!(workers = self.worker_cancels.len(), "stopping workers");
        for cancel in &self.worker_cancels {
            cancel.cancel();
        }

        match tokio::time::timeout(self.shutdown_timeout, join_all(self.worker_handles)).await {
            Ok(results) => {
                for result in results {
                    if let Err(error) = result {
                        tracing::error!(%error, "worker task ended abnormally");
                    }
                }
                tracing::info!("all workers stopped");
                Ok(())
            }
            Err(_) => Err(QueueError::ShutdownTimeout {
                timeout: self.shutdown_timeout,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::state::WorkerPhase;

    #[test]
    fn construction_rejects_zero_workers() {
        let result = JobQueue::new(0, Duration::from_secs(60));
        assert_matches!(result, Err(QueueError::InvalidWorkerCount(0)));
    }

    #[tokio::test]
    async fn states_before_start_are_initialized_in_id_order() {
        let queue = JobQueue::new(4, Duration::from_secs(60)).unwrap();
        let states = queue.worker_states();

        assert_eq!(states.len(), 4);
        for (expected_id, state) in states.iter().enumerate() {
            assert_eq!(state.id, expected_id);
            assert_eq!(state.phase, WorkerPhase::Initialized);
            assert_eq!(state.job_id, None);
        }

        let status = queue.status();
        assert_eq!(status.total_workers, 4);
        assert_eq!(status.active_workers, 0);
        assert_eq!(status.ready_workers, 0);
    }

    #[tokio::test]
    async fn submit_before_start_is_rejected() {
        struct NoopJob(uuid::Uuid);

        #[async_trait::async_trait]
        impl Job for NoopJob {
            fn id(&self) -> uuid::Uuid {
                self.0
            }
            async fn process(&self, _log: &crate::WorkerLog) {}
            async fn on_error(&self, _log: &crate::WorkerLog, _panic: crate::PanicPayload) {}
        }

        let queue = JobQueue::new(1, Duration::from_secs(60)).unwrap();
        let result = queue.submit(Box::new(NoopJob(uuid::Uuid::new_v4()))).await;
        assert_matches!(result, Err(QueueError::NotStarted));
    }

    #[tokio::test]
    async fn stop_before_start_is_rejected() {
        let queue = JobQueue::new(1, Duration::from_secs(60)).unwrap();
        assert_matches!(queue.stop().await, Err(QueueError::NotStarted));
    }
}

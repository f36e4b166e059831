//! The job contract.

use std::any::Any;

use async_trait::async_trait;
use uuid::Uuid;

use crate::log::WorkerLog;

/// The payload recovered from a panicking [`Job::process`] call, as yielded
/// by `catch_unwind`.
pub type PanicPayload = Box<dyn Any + Send + 'static>;

/// A discrete unit of work executed by the worker pool.
///
/// Jobs are created by a submitter, handed to the queue via
/// [`JobQueue::submit`](crate::JobQueue::submit), owned exclusively by the
/// one worker that executes them, and discarded afterwards. No result is
/// propagated back to the submitter; a job that needs to report results must
/// own its own side channel.
#[async_trait]
pub trait Job: Send + 'static {
    /// Stable unique identifier, used for logging and correlation. Must not
    /// change after creation.
    fn id(&self) -> Uuid;

    /// Perform the work.
    ///
    /// May panic; the executing worker catches the panic, reports it through
    /// [`Job::on_error`], and keeps running.
    async fn process(&self, log: &WorkerLog);

    /// Called exactly once by the executing worker when [`Job::process`]
    /// panicked, with the original panic payload.
    async fn on_error(&self, log: &WorkerLog, panic: PanicPayload);
}

/// Extract a human-readable message from a panic payload.
///
/// Panics raised via `panic!("...")` carry a `&'static str` or a `String`;
/// anything else yields a placeholder.
pub fn panic_message(payload: &PanicPayload) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_extracts_static_str() {
        let payload: PanicPayload = Box::new("boom");
        assert_eq!(panic_message(&payload), "boom");
    }

    #[test]
    fn panic_message_extracts_string() {
        let payload: PanicPayload = Box::new(String::from("kaboom"));
        assert_eq!(panic_message(&payload), "kaboom");
    }

    #[test]
    fn panic_message_falls_back_for_other_payloads() {
        let payload: PanicPayload = Box::new(42_u32);
        assert_eq!(panic_message(&payload), "<non-string panic payload>");
    }
}

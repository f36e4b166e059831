//! Demo job submitted through the HTTP surface.

use async_trait::async_trait;
use jobd_queue::{panic_message, Job, PanicPayload, WorkerLog};
use serde::Serialize;
use uuid::Uuid;

/// A smoke-test job whose `process` panics with its message on purpose,
/// exercising the worker's panic-recovery path end to end. Submitted via
/// `POST /api/v1/jobs/test`.
#[derive(Debug, Clone, Serialize)]
pub struct TestJob {
    pub id: Uuid,
    pub message: String,
}

impl TestJob {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Job for TestJob {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn process(&self, log: &WorkerLog) {
        log.debug("test job processing");
        panic!("{}", self.message);
    }

    async fn on_error(&self, log: &WorkerLog, panic: PanicPayload) {
        log.error(&format!(
            "failed to execute job: \"{}\"",
            panic_message(&panic)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_serializes_id_and_message() {
        let job = TestJob::new("test");
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["message"], "test");
        assert_eq!(json["id"], job.id.to_string());
    }
}

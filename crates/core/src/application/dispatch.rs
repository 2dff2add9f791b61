// Dispatch - fire-and-forget conversion scheduling

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use super::convert::ConvertRunner;
use crate::domain::JobId;

/// Schedules conversion runs on the tokio runtime.
///
/// Dispatch is fire-and-forget: nothing tracks, retries, or reaps the
/// spawned task. The handle is returned so callers that need completion
/// (tests, embedders) can await it; dropping it detaches the task.
pub struct Dispatcher {
    runner: Arc<ConvertRunner>,
}

impl Dispatcher {
    pub fn new(runner: Arc<ConvertRunner>) -> Self {
        Self { runner }
    }

    pub fn dispatch(&self, id: JobId, width: u32) -> JoinHandle<()> {
        debug!(job_id = %id, width, "Dispatching conversion");
        let runner = Arc::clone(&self.runner);
        tokio::task::spawn(async move {
            runner.run(&id, width).await;
        })
    }
}

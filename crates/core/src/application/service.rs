// Convert Service - facade over the upload/convert/inspect use cases

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;

use super::convert::ConvertRunner;
use super::dispatch::Dispatcher;
use super::stats::{ServiceStats, StatsSnapshot};
use super::submit::{self, SubmitRequest};
use crate::domain::{CharRamp, JobId, StatusRecord};
use crate::error::{AppError, Result};
use crate::port::{ArtifactStore, RecordStore, StorageError, TimeProvider};

/// Convert Service
///
/// The single entry point the API surface talks to. The runner and
/// dispatcher are wired once at startup; everything else is per-request.
pub struct ConvertService {
    artifacts: Arc<dyn ArtifactStore>,
    records: Arc<dyn RecordStore>,
    time_provider: Arc<dyn TimeProvider>,
    stats: Arc<ServiceStats>,
    dispatcher: Dispatcher,
}

impl ConvertService {
    pub fn new(
        artifacts: Arc<dyn ArtifactStore>,
        records: Arc<dyn RecordStore>,
        time_provider: Arc<dyn TimeProvider>,
        stats: Arc<ServiceStats>,
        ramp: CharRamp,
    ) -> Self {
        let runner = Arc::new(ConvertRunner::new(
            Arc::clone(&artifacts),
            Arc::clone(&records),
            Arc::clone(&time_provider),
            Arc::clone(&stats),
            ramp,
        ));
        Self {
            artifacts,
            records,
            time_provider,
            stats,
            dispatcher: Dispatcher::new(runner),
        }
    }

    /// Accept an upload and persist it as a queued job.
    pub async fn submit(&self, req: SubmitRequest) -> Result<JobId> {
        submit::execute(
            self.artifacts.as_ref(),
            self.records.as_ref(),
            self.time_provider.as_ref(),
            &self.stats,
            req,
        )
        .await
    }

    /// Schedule the conversion of a previously submitted job.
    pub fn dispatch(&self, id: JobId, width: u32) -> JoinHandle<()> {
        self.dispatcher.dispatch(id, width)
    }

    /// Raw status record, exactly as stored.
    pub async fn status(&self, id: &JobId) -> Result<Value> {
        match self.records.read(id).await.map_err(not_found_or_storage)? {
            Some(record) => Ok(record),
            None => Err(AppError::NotFound(format!(
                "No status record for job {}",
                id
            ))),
        }
    }

    /// Typed view of the status record.
    pub async fn status_record(&self, id: &JobId) -> Result<StatusRecord> {
        let raw = self.status(id).await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Rendered text artifact. Present only once the job is ready.
    pub async fn rendered(&self, id: &JobId) -> Result<String> {
        self.artifacts
            .read_rendered(id)
            .await
            .map_err(not_found_or_storage)
    }

    /// Original uploaded bytes.
    pub async fn original(&self, id: &JobId) -> Result<Vec<u8>> {
        self.artifacts
            .read_original(id)
            .await
            .map_err(not_found_or_storage)
    }

    /// Every known job id, in no particular order.
    pub async fn list(&self) -> Result<Vec<JobId>> {
        Ok(self.artifacts.list().await?)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

// Absent artifacts surface as NotFound so the API maps them to a client
// error instead of a server fault.
fn not_found_or_storage(err: StorageError) -> AppError {
    if matches!(err, StorageError::NotFound { .. }) {
        AppError::NotFound(err.to_string())
    } else {
        AppError::Storage(err)
    }
}

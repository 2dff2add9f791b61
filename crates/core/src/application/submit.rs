// Submit Use Case

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::stats::ServiceStats;
use crate::domain::{JobId, StatusRecord};
use crate::error::Result;
use crate::port::{ArtifactStore, RecordStore, TimeProvider};

/// Upload submission (bytes already decoded from the wire)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub filename: String,
    pub content: Vec<u8>,
    /// Render width, forwarded to the dispatch that follows submission
    pub width: u32,
}

/// Execute submit use case
///
/// Allocates a job space, persists the original bytes, and writes the
/// initial `queued` status record. The conversion itself runs only after
/// a separate dispatch.
///
/// # Arguments
///
/// * `artifacts` - Artifact store (job space allocation + original bytes)
/// * `records` - Status record store
/// * `time_provider` - Time provider (injected for determinism)
/// * `stats` - Process counters
/// * `req` - Submit request
pub async fn execute(
    artifacts: &dyn ArtifactStore,
    records: &dyn RecordStore,
    time_provider: &dyn TimeProvider,
    stats: &ServiceStats,
    req: SubmitRequest,
) -> Result<JobId> {
    let space = artifacts.allocate().await?;
    artifacts.write_original(&space.id, &req.content).await?;

    let created_unix = time_provider.now_millis() / 1000;
    let record = StatusRecord::queued(req.filename.as_str(), created_unix);
    records.merge(&space.id, record.into_fields()?).await?;

    stats.record_upload();
    info!(
        job_id = %space.id,
        filename = %req.filename,
        size_bytes = req.content.len(),
        width = req.width,
        "Upload accepted"
    );

    Ok(space.id)
}

// Conversion Job Runner
//
// Owns a single conversion attempt end to end. Every failure inside the
// attempt is absorbed into a terminal `error` status record, so run()
// itself never fails and a dispatched task cannot take the daemon down.

use std::sync::Arc;

use tracing::{error, info};

use crate::application::stats::ServiceStats;
use crate::domain::raster::{intensity_map, render};
use crate::domain::{CharRamp, ConvertOutcome, JobId, SourceImage};
use crate::error::Result;
use crate::port::{ArtifactStore, RecordStore, TimeProvider};

pub struct ConvertRunner {
    artifacts: Arc<dyn ArtifactStore>,
    records: Arc<dyn RecordStore>,
    time_provider: Arc<dyn TimeProvider>,
    stats: Arc<ServiceStats>,
    ramp: CharRamp,
}

impl ConvertRunner {
    pub fn new(
        artifacts: Arc<dyn ArtifactStore>,
        records: Arc<dyn RecordStore>,
        time_provider: Arc<dyn TimeProvider>,
        stats: Arc<ServiceStats>,
        ramp: CharRamp,
    ) -> Self {
        Self {
            artifacts,
            records,
            time_provider,
            stats,
            ramp,
        }
    }

    /// Run one conversion attempt and persist its terminal status.
    ///
    /// Exactly one status write happens per run, whichever way the attempt
    /// ends. Re-running on the same inputs overwrites the artifacts with
    /// identical content (the transform is deterministic; `convert_time`
    /// is identical under a fixed clock).
    pub async fn run(&self, id: &JobId, width: u32) {
        let started = self.time_provider.now_millis();

        let outcome = match self.convert(id, width, started).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(job_id = %id, error = %e, "Conversion failed");
                self.stats.record_error();
                ConvertOutcome::error(e.to_string())
            }
        };

        if let Err(e) = self.records.merge(id, outcome.into_fields()).await {
            // nothing left to absorb this into; log and move on
            error!(job_id = %id, error = %e, "Failed to persist terminal status");
        }
    }

    async fn convert(&self, id: &JobId, width: u32, started_millis: i64) -> Result<ConvertOutcome> {
        let bytes = self.artifacts.read_original(id).await?;
        let source = SourceImage::decode(&bytes)?;
        let original_size = source.dimensions();

        let grid = intensity_map(source.image(), width, self.ramp.len())?;
        let text = render(&grid, &self.ramp);
        self.artifacts.write_rendered(id, &text).await?;

        let convert_time = (self.time_provider.now_millis() - started_millis) as f64 / 1000.0;
        info!(
            job_id = %id,
            width,
            rows = grid.height(),
            convert_time,
            "Conversion succeeded"
        );
        Ok(ConvertOutcome::ready(
            source.format_name(),
            original_size,
            convert_time,
        ))
    }
}

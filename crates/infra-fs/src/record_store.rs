// Filesystem RecordStore Implementation
//
// Records are JSON objects updated by shallow merge and swapped into place
// with a write-to-temp-then-rename, so a concurrent reader never observes
// a half-written record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::warn;

use glyphcast_core::domain::{JobId, JobState};
use glyphcast_core::port::{RecordStore, StorageError};

use crate::artifact_store::io_error;
use crate::layout;

pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

// A prior record that is missing or unparseable merges as empty, so a
// corrupt record heals on the next write instead of wedging the job.
async fn read_object(path: &Path) -> Map<String, Value> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(_) => return Map::new(),
    };
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            warn!(path = %path.display(), "Discarding malformed status record");
            Map::new()
        }
    }
}

fn state_of(map: &Map<String, Value>) -> Option<JobState> {
    map.get("state")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

#[async_trait]
impl RecordStore for FsRecordStore {
    async fn merge(&self, id: &JobId, fields: Map<String, Value>) -> Result<(), StorageError> {
        let path = layout::record_path(&self.root, id);
        let mut record = read_object(&path).await;

        if let (Some(prev), Some(next)) = (state_of(&record), state_of(&fields)) {
            if !prev.can_transition_to(next) {
                // the merge proceeds anyway; the record converges on the
                // last write
                warn!(job_id = %id, %prev, %next, "Overwriting terminal status");
            }
        }

        for (key, value) in fields {
            record.insert(key, value);
        }

        let bytes =
            serde_json::to_vec(&Value::Object(record)).map_err(|e| StorageError::Encode {
                path: path.display().to_string(),
                source: e,
            })?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes).await.map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &path).await.map_err(|e| io_error(&path, e))
    }

    async fn read(&self, id: &JobId) -> Result<Option<Value>, StorageError> {
        let path = layout::record_path(&self.root, id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value @ Value::Object(_)) => Ok(Some(value)),
            Ok(_) | Err(_) => {
                warn!(path = %path.display(), "Unreadable status record treated as absent");
                Ok(None)
            }
        }
    }
}

// Job Identity Domain Model

use std::path::PathBuf;

/// Job ID (UUID v7, time-ordered)
pub type JobId = String;

/// Storage location reserved for exactly one job's artifacts.
///
/// Produced by `ArtifactStore::allocate`; the directory exists and is empty
/// at the moment the space is handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpace {
    pub id: JobId,
    pub dir: PathBuf,
}

impl JobSpace {
    pub fn new(id: impl Into<JobId>, dir: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            dir: dir.into(),
        }
    }
}

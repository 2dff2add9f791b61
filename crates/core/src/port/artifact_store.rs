// Artifact Store Port
// Abstraction over per-job binary/text artifact storage.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{JobId, JobSpace};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("No such file or directory: {path}")]
    NotFound { path: String },

    #[error("Storage IO failure at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot encode record at {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Artifact Store trait
///
/// One job space holds the original upload and, after a successful
/// conversion, the rendered text. Implementations:
/// - FsArtifactStore: one directory per job under a data root
/// - mocks::InMemoryArtifactStore: map-backed store for tests
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Reserve a fresh job space under a unique id.
    ///
    /// Id collisions are resolved internally by drawing another id; the
    /// returned space is always newly created and empty.
    async fn allocate(&self) -> Result<JobSpace, StorageError>;

    async fn write_original(&self, id: &JobId, bytes: &[u8]) -> Result<(), StorageError>;

    /// # Errors
    /// - StorageError::NotFound (naming the missing path) if the job space
    ///   or the artifact does not exist
    async fn read_original(&self, id: &JobId) -> Result<Vec<u8>, StorageError>;

    async fn write_rendered(&self, id: &JobId, text: &str) -> Result<(), StorageError>;

    async fn read_rendered(&self, id: &JobId) -> Result<String, StorageError>;

    /// Ids of every allocated job space, in no particular order.
    async fn list(&self) -> Result<Vec<JobId>, StorageError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    #[derive(Default, Clone)]
    struct Space {
        original: Option<Vec<u8>>,
        rendered: Option<String>,
    }

    /// Map-backed artifact store for exercising the pipeline without a
    /// filesystem.
    #[derive(Default)]
    pub struct InMemoryArtifactStore {
        spaces: Mutex<HashMap<JobId, Space>>,
        allocated: AtomicU64,
    }

    impl InMemoryArtifactStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a job space that already holds original bytes.
        pub fn with_original(self, id: impl Into<JobId>, bytes: Vec<u8>) -> Self {
            self.spaces.lock().unwrap().insert(
                id.into(),
                Space {
                    original: Some(bytes),
                    rendered: None,
                },
            );
            self
        }

        /// Seed an empty job space (no original written yet).
        pub fn with_empty_space(self, id: impl Into<JobId>) -> Self {
            self.spaces
                .lock()
                .unwrap()
                .insert(id.into(), Space::default());
            self
        }

        pub fn rendered(&self, id: &str) -> Option<String> {
            self.spaces
                .lock()
                .unwrap()
                .get(id)
                .and_then(|s| s.rendered.clone())
        }
    }

    #[async_trait]
    impl ArtifactStore for InMemoryArtifactStore {
        async fn allocate(&self) -> Result<JobSpace, StorageError> {
            let n = self.allocated.fetch_add(1, Ordering::SeqCst) + 1;
            let id = format!("job-{}", n);
            self.spaces
                .lock()
                .unwrap()
                .insert(id.clone(), Space::default());
            Ok(JobSpace::new(id.clone(), PathBuf::from(id)))
        }

        async fn write_original(&self, id: &JobId, bytes: &[u8]) -> Result<(), StorageError> {
            match self.spaces.lock().unwrap().get_mut(id) {
                Some(space) => {
                    space.original = Some(bytes.to_vec());
                    Ok(())
                }
                None => Err(StorageError::NotFound { path: id.clone() }),
            }
        }

        async fn read_original(&self, id: &JobId) -> Result<Vec<u8>, StorageError> {
            self.spaces
                .lock()
                .unwrap()
                .get(id)
                .and_then(|s| s.original.clone())
                .ok_or_else(|| StorageError::NotFound {
                    path: format!("{}/original", id),
                })
        }

        async fn write_rendered(&self, id: &JobId, text: &str) -> Result<(), StorageError> {
            match self.spaces.lock().unwrap().get_mut(id) {
                Some(space) => {
                    space.rendered = Some(text.to_string());
                    Ok(())
                }
                None => Err(StorageError::NotFound { path: id.clone() }),
            }
        }

        async fn read_rendered(&self, id: &JobId) -> Result<String, StorageError> {
            self.spaces
                .lock()
                .unwrap()
                .get(id)
                .and_then(|s| s.rendered.clone())
                .ok_or_else(|| StorageError::NotFound {
                    path: format!("{}/ascii", id),
                })
        }

        async fn list(&self) -> Result<Vec<JobId>, StorageError> {
            Ok(self.spaces.lock().unwrap().keys().cloned().collect())
        }
    }
}

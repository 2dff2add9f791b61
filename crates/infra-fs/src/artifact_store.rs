// Filesystem ArtifactStore Implementation

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use glyphcast_core::domain::{JobId, JobSpace};
use glyphcast_core::port::{ArtifactStore, IdProvider, StorageError};

use crate::layout;

/// One directory per job under a single data root.
///
/// Allocation leans on `create_dir` atomicity: if two allocations race to
/// the same id, exactly one wins and the loser draws a fresh id.
pub struct FsArtifactStore {
    root: PathBuf,
    ids: Arc<dyn IdProvider>,
}

impl FsArtifactStore {
    /// Open the store, creating the data root if needed.
    pub async fn open(
        root: impl Into<PathBuf>,
        ids: Arc<dyn IdProvider>,
    ) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| io_error(&root, e))?;
        Ok(Self { root, ids })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write_file(&self, path: PathBuf, bytes: &[u8]) -> Result<(), StorageError> {
        fs::write(&path, bytes).await.map_err(|e| io_error(&path, e))
    }
}

pub(crate) fn io_error(path: &Path, err: std::io::Error) -> StorageError {
    let path = path.display().to_string();
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound { path }
    } else {
        StorageError::Io { path, source: err }
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn allocate(&self) -> Result<JobSpace, StorageError> {
        loop {
            let id = self.ids.generate_id();
            let dir = layout::job_dir(&self.root, &id);
            match fs::create_dir(&dir).await {
                Ok(()) => return Ok(JobSpace::new(id, dir)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    // id already taken, draw another
                    debug!(job_id = %id, "Id collision during allocation, retrying");
                }
                Err(e) => return Err(io_error(&dir, e)),
            }
        }
    }

    async fn write_original(&self, id: &JobId, bytes: &[u8]) -> Result<(), StorageError> {
        self.write_file(layout::original_path(&self.root, id), bytes)
            .await
    }

    async fn read_original(&self, id: &JobId) -> Result<Vec<u8>, StorageError> {
        let path = layout::original_path(&self.root, id);
        fs::read(&path).await.map_err(|e| io_error(&path, e))
    }

    async fn write_rendered(&self, id: &JobId, text: &str) -> Result<(), StorageError> {
        self.write_file(layout::rendered_path(&self.root, id), text.as_bytes())
            .await
    }

    async fn read_rendered(&self, id: &JobId) -> Result<String, StorageError> {
        let path = layout::rendered_path(&self.root, id);
        let bytes = fs::read(&path).await.map_err(|e| io_error(&path, e))?;
        String::from_utf8(bytes).map_err(|e| StorageError::Io {
            path: path.display().to_string(),
            source: std::io::Error::new(ErrorKind::InvalidData, e),
        })
    }

    async fn list(&self) -> Result<Vec<JobId>, StorageError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| io_error(&self.root, e))?;

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.root, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue; // stray files in the root are not job spaces
            }
            if let Ok(name) = entry.file_name().into_string() {
                ids.push(name);
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphcast_core::port::id_provider::mocks::ScriptedIdProvider;
    use glyphcast_core::port::id_provider::UuidProvider;

    async fn store_with(ids: Arc<dyn IdProvider>) -> (tempfile::TempDir, FsArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path(), ids).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_allocate_creates_an_empty_job_dir() {
        let (_tmp, store) = store_with(Arc::new(UuidProvider)).await;

        let space = store.allocate().await.unwrap();
        assert!(space.dir.is_dir());
        assert_eq!(std::fs::read_dir(&space.dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_allocate_retries_on_id_collision() {
        let ids = Arc::new(ScriptedIdProvider::new(["dup", "dup", "fresh"]));
        let (_tmp, store) = store_with(ids).await;

        let first = store.allocate().await.unwrap();
        let second = store.allocate().await.unwrap();

        assert_eq!(first.id, "dup");
        // second draw collides with the existing dir and falls through
        assert_eq!(second.id, "fresh");
    }

    #[tokio::test]
    async fn test_original_round_trip() {
        let (_tmp, store) = store_with(Arc::new(UuidProvider)).await;
        let space = store.allocate().await.unwrap();

        store.write_original(&space.id, &[7, 8, 9]).await.unwrap();
        assert_eq!(store.read_original(&space.id).await.unwrap(), vec![7, 8, 9]);
    }

    #[tokio::test]
    async fn test_rendered_round_trip() {
        let (_tmp, store) = store_with(Arc::new(UuidProvider)).await;
        let space = store.allocate().await.unwrap();

        store.write_rendered(&space.id, "ab\ncd").await.unwrap();
        assert_eq!(store.read_rendered(&space.id).await.unwrap(), "ab\ncd");
    }

    #[tokio::test]
    async fn test_missing_original_names_the_path() {
        let (_tmp, store) = store_with(Arc::new(UuidProvider)).await;
        let space = store.allocate().await.unwrap();

        let err = store.read_original(&space.id).await.unwrap_err();
        match err {
            StorageError::NotFound { path } => {
                assert!(path.ends_with("original"), "got: {}", path);
                assert!(path.contains(&space.id));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_skips_stray_files() {
        let (tmp, store) = store_with(Arc::new(ScriptedIdProvider::new(["a", "b"]))).await;

        store.allocate().await.unwrap();
        store.allocate().await.unwrap();
        std::fs::write(tmp.path().join("not-a-job.txt"), b"x").unwrap();

        let mut ids = store.list().await.unwrap();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}

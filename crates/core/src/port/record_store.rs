// Record Store Port
// Merge-only persistence for JSON status records.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::artifact_store::StorageError;
use crate::domain::JobId;

/// Record Store trait
///
/// Records only ever grow through shallow merges, so concurrent writers
/// converge instead of truncating each other's keys.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Shallow-merge `fields` into the job's status record.
    ///
    /// Keys in `fields` win; existing keys not mentioned are preserved.
    /// A missing or unreadable prior record is treated as empty, so a
    /// corrupt record heals on the next write.
    async fn merge(&self, id: &JobId, fields: Map<String, Value>) -> Result<(), StorageError>;

    /// Current record, or None when absent or unreadable.
    async fn read(&self, id: &JobId) -> Result<Option<Value>, StorageError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Map-backed record store with the same merge semantics as the
    /// filesystem adapter.
    #[derive(Default)]
    pub struct InMemoryRecordStore {
        records: Mutex<HashMap<JobId, Map<String, Value>>>,
    }

    impl InMemoryRecordStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn record(&self, id: &str) -> Option<Value> {
            self.records
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .map(Value::Object)
        }
    }

    #[async_trait]
    impl RecordStore for InMemoryRecordStore {
        async fn merge(&self, id: &JobId, fields: Map<String, Value>) -> Result<(), StorageError> {
            let mut records = self.records.lock().unwrap();
            let record = records.entry(id.clone()).or_default();
            for (key, value) in fields {
                record.insert(key, value);
            }
            Ok(())
        }

        async fn read(&self, id: &JobId) -> Result<Option<Value>, StorageError> {
            Ok(self.record(id))
        }
    }
}

// Port Layer - Interfaces for external dependencies

pub mod artifact_store;
pub mod id_provider; // For deterministic testing
pub mod record_store;
pub mod time_provider;

// Re-exports
pub use artifact_store::{ArtifactStore, StorageError};
pub use id_provider::IdProvider;
pub use record_store::RecordStore;
pub use time_provider::TimeProvider;

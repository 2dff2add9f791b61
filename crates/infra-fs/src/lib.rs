// Glyphcast Infrastructure - Filesystem Adapter
// Implements: ArtifactStore, RecordStore over one directory per job

mod artifact_store;
mod layout;
mod record_store;

pub use artifact_store::FsArtifactStore;
pub use layout::{job_dir, original_path, record_path, rendered_path};
pub use record_store::FsRecordStore;

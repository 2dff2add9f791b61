// On-Disk Layout of a Job Space
//
// <data_root>/<job_id>/original   uploaded bytes, verbatim
// <data_root>/<job_id>/ascii      rendered text (ready jobs only)
// <data_root>/<job_id>/meta       JSON status record

use std::path::{Path, PathBuf};

pub const ORIGINAL_FILE: &str = "original";
pub const RENDERED_FILE: &str = "ascii";
pub const RECORD_FILE: &str = "meta";

pub fn job_dir(root: &Path, id: &str) -> PathBuf {
    root.join(id)
}

pub fn original_path(root: &Path, id: &str) -> PathBuf {
    job_dir(root, id).join(ORIGINAL_FILE)
}

pub fn rendered_path(root: &Path, id: &str) -> PathBuf {
    job_dir(root, id).join(RENDERED_FILE)
}

pub fn record_path(root: &Path, id: &str) -> PathBuf {
    job_dir(root, id).join(RECORD_FILE)
}

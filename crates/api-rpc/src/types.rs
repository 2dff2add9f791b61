//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};

/// image.upload.v1 - Submit an image for conversion
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    /// Base64-encoded image bytes
    pub content: String,
    /// Render width in glyphs; the server default applies when omitted
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub image_id: String,
    pub state: String,
}

/// image.meta.v1 - Read a job's status record
///
/// The result is the stored record verbatim, so keys written by other
/// tooling pass through untouched.
#[derive(Debug, Deserialize)]
pub struct MetaRequest {
    pub image_id: String,
}

/// image.ascii.v1 - Read the rendered text
#[derive(Debug, Deserialize)]
pub struct AsciiRequest {
    pub image_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AsciiResponse {
    pub image_id: String,
    pub ascii: String,
}

/// image.original.v1 - Read back the original upload
#[derive(Debug, Deserialize)]
pub struct OriginalRequest {
    pub image_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OriginalResponse {
    pub image_id: String,
    pub media_type: String,
    /// Base64-encoded image bytes
    pub content: String,
}

/// image.list.v1 - List every known job id
#[derive(Debug, Deserialize)]
pub struct ListRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub images: Vec<String>,
}

/// admin.stats.v1 - Service counters
#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub uploaded_count: u64,
    pub errors: u64,
    pub uptime_seconds: i64,
}

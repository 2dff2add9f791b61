//! RPC Method Handlers
//!
//! Implements the wire-facing logic for each JSON-RPC method.

use crate::error::{code, to_rpc_error};
use crate::types::{
    AsciiRequest, AsciiResponse, ListRequest, ListResponse, MetaRequest, OriginalRequest,
    OriginalResponse, StatsRequest, StatsResponse, UploadRequest, UploadResponse,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use glyphcast_core::application::{ConvertService, SubmitRequest};
use glyphcast_core::domain::raster;
use glyphcast_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;

const DEFAULT_RENDER_WIDTH: u32 = 100;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<ConvertService>,
    default_width: u32,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(service: Arc<ConvertService>) -> Self {
        // Default render width (configurable via env)
        let default_width: u32 = std::env::var("GLYPHCAST_DEFAULT_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RENDER_WIDTH);

        Self {
            service,
            default_width,
            start_time: std::time::Instant::now(),
        }
    }

    /// image.upload.v1
    pub async fn upload(&self, params: UploadRequest) -> Result<UploadResponse, ErrorObjectOwned> {
        let content = BASE64.decode(params.content.as_bytes()).map_err(|e| {
            ErrorObjectOwned::owned(
                code::VALIDATION_ERROR,
                format!("content is not valid base64: {}", e),
                None::<()>,
            )
        })?;

        let width = params.width.unwrap_or(self.default_width);
        let image_id = self
            .service
            .submit(SubmitRequest {
                filename: params.filename,
                content,
                width,
            })
            .await
            .map_err(to_rpc_error)?;

        // fire-and-forget; completion is observed through image.meta.v1
        self.service.dispatch(image_id.clone(), width);

        Ok(UploadResponse {
            image_id,
            state: "queued".to_string(),
        })
    }

    /// image.meta.v1
    pub async fn meta(&self, params: MetaRequest) -> Result<serde_json::Value, ErrorObjectOwned> {
        self.service
            .status(&params.image_id)
            .await
            .map_err(to_rpc_error)
    }

    /// image.ascii.v1
    pub async fn ascii(&self, params: AsciiRequest) -> Result<AsciiResponse, ErrorObjectOwned> {
        let ascii = self
            .service
            .rendered(&params.image_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(AsciiResponse {
            image_id: params.image_id,
            ascii,
        })
    }

    /// image.original.v1
    pub async fn original(
        &self,
        params: OriginalRequest,
    ) -> Result<OriginalResponse, ErrorObjectOwned> {
        let bytes = self
            .service
            .original(&params.image_id)
            .await
            .map_err(to_rpc_error)?;

        let media_type = raster::sniff_media_type(&bytes).ok_or_else(|| {
            to_rpc_error(AppError::Internal(format!(
                "Cannot determine image format for job {}",
                params.image_id
            )))
        })?;

        Ok(OriginalResponse {
            image_id: params.image_id,
            media_type: media_type.to_string(),
            content: BASE64.encode(&bytes),
        })
    }

    /// image.list.v1
    pub async fn list(&self, _params: ListRequest) -> Result<ListResponse, ErrorObjectOwned> {
        let images = self.service.list().await.map_err(to_rpc_error)?;
        Ok(ListResponse { images })
    }

    /// admin.stats.v1
    pub async fn stats(&self, _params: StatsRequest) -> Result<StatsResponse, ErrorObjectOwned> {
        let snap = self.service.stats();
        Ok(StatsResponse {
            uploaded_count: snap.uploaded_count,
            errors: snap.errors,
            uptime_seconds: self.start_time.elapsed().as_secs() as i64,
        })
    }
}

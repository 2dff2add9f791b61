//! JSON-RPC Server
//!
//! Serves JSON-RPC 2.0 over TCP on localhost.

use crate::handler::RpcHandler;
use crate::types::{
    AsciiRequest, ListRequest, MetaRequest, OriginalRequest, StatsRequest, UploadRequest,
};
use glyphcast_core::application::ConvertService;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 8080;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<ConvertService>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Security: binds to 127.0.0.1 only (no external access)
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server on TCP (localhost only)"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        // Register methods
        let handler = self.handler.clone();
        module
            .register_async_method("image.upload.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UploadRequest = params.parse()?;
                    handler.upload(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("image.meta.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: MetaRequest = params.parse()?;
                    handler.meta(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("image.ascii.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: AsciiRequest = params.parse()?;
                    handler.ascii(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("image.original.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: OriginalRequest = params.parse()?;
                    handler.original(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("image.list.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ListRequest = params.parse()?;
                    handler.list(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Admin APIs
        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: StatsRequest = params.parse()?;
                    handler.stats(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}

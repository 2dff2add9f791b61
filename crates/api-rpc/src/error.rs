//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use glyphcast_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const STORAGE_ERROR: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::Domain(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Raster(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Storage(e) => {
            ErrorObjectOwned::owned(code::STORAGE_ERROR, e.to_string(), None::<()>)
        }
        AppError::Io(e) => ErrorObjectOwned::owned(code::STORAGE_ERROR, e.to_string(), None::<()>),
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphcast_core::port::StorageError;

    #[test]
    fn test_client_faults_map_to_4xxx() {
        let err = to_rpc_error(AppError::Validation("width missing".to_string()));
        assert_eq!(err.code(), code::VALIDATION_ERROR);

        let err = to_rpc_error(AppError::NotFound("no job abc".to_string()));
        assert_eq!(err.code(), code::NOT_FOUND);
        assert!(err.message().contains("no job abc"));
    }

    #[test]
    fn test_server_faults_map_to_5xxx() {
        let err = to_rpc_error(AppError::Storage(StorageError::NotFound {
            path: "/data/x/original".to_string(),
        }));
        assert_eq!(err.code(), code::STORAGE_ERROR);

        let err = to_rpc_error(AppError::Internal("wiring".to_string()));
        assert_eq!(err.code(), code::INTERNAL_ERROR);
    }
}

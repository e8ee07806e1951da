//! Error types for the pantry service.
//!
//! `StorageError` covers the embedded store; `ApiError` is the crate-level
//! error that the HTTP layer maps to response status codes.

use thiserror::Error;

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The store could not be opened or has become unusable. Surfaced as a
    /// fatal startup error, never per-request.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::StoreUnavailable(err.to_string())
    }
}

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The external model provider returned no usable content.
    #[error("provider error: {0}")]
    ProviderError(String),

    #[error("upload error: {0}")]
    UploadError(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),
}

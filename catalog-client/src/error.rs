//! Client error types

use thiserror::Error;

use crate::controller::form::FieldErrors;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Request never settled into a response (connect, timeout, decode)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Asset upload to the blob store failed
    #[error("upload failed: {0}")]
    Upload(String),

    /// Form fields failed validation; no remote call was made
    #[error("validation failed")]
    Validation(FieldErrors),

    /// Response body did not match the expected shape
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

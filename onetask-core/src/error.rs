//! Error types for onetask-core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown task status: {0}")]
    UnknownTaskStatus(String),

    #[error("Unknown task type: {0}")]
    UnknownTaskType(String),

    #[error("Malformed Basic credentials")]
    MalformedCredentials,

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

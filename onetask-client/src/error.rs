//! Client error types
//!
//! The taxonomy mirrors how failures reach the user: validation errors
//! never touch the network, auth errors come back from the credential
//! exchange, conflict errors are advisory client-side guards, and
//! everything else on the wire is a plain network error. Nothing is
//! retried automatically.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Password and confirmation do not match")]
    PasswordMismatch,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Registration rejected: {0}")]
    RegistrationRejected(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("You have already sent a proposal for this task")]
    AlreadyApplied,

    #[error("Unexpected status {status} from {path}")]
    UnexpectedStatus { status: u16, path: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

use service_core::error::AppError;
use thiserror::Error;

use crate::navigation::Route;
use crate::session::StorageError;

/// Failures surfaced by the session client and the typed backend clients.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Account locked: {message}")]
    AccountLocked {
        retry_after_seconds: Option<u64>,
        message: String,
    },

    #[error("Session expired")]
    SessionExpired,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// HTTP status carried by the error, when the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::InvalidCredentials(_) => Some(401),
            ClientError::AccountLocked { .. } => Some(423),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(e) => AppError::BadGateway(e.to_string()),
            ClientError::Http { status, message } => match status {
                400 => AppError::BadRequest(anyhow::anyhow!(message)),
                401 => AppError::Unauthorized(anyhow::anyhow!(message)),
                403 => AppError::Forbidden(anyhow::anyhow!(message)),
                404 => AppError::NotFound(anyhow::anyhow!(message)),
                409 => AppError::Conflict(anyhow::anyhow!(message)),
                422 => AppError::BadRequest(anyhow::anyhow!(message)),
                503 => AppError::ServiceUnavailable,
                _ => AppError::BadGateway(format!("{} ({})", message, status)),
            },
            ClientError::InvalidCredentials(message) => {
                AppError::Unauthorized(anyhow::anyhow!(message))
            }
            ClientError::AccountLocked {
                retry_after_seconds,
                message,
            } => AppError::Locked(message, retry_after_seconds),
            ClientError::SessionExpired => {
                AppError::SessionExpired(Route::Login.path().to_string())
            }
            ClientError::Validation(e) => AppError::ValidationError(e),
            ClientError::Decode(message) => AppError::BadGateway(message),
            ClientError::Storage(e) => AppError::InternalError(anyhow::Error::new(e)),
        }
    }
}

//! Client error types
//!
//! Domain rejections (invalid transition, hold contention, staleness)
//! are expected and frequent; they travel as [`ClientError::Domain`]
//! so flow logic can match on the code. Infrastructure failures are
//! kept distinct so callers can tell "you can't do that" from "the
//! network is down".

use shared::error::AppError;
use thiserror::Error;

use crate::storage::StorageError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Domain-level rejection with a structured error code
    #[error("{0}")]
    Domain(#[from] AppError),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Push channel or other transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Authentication failure; terminal for the push channel
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Local persistence failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Infrastructure failures worth retrying; domain rejections and
    /// auth failures are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Http(_) | ClientError::Transport(_))
    }

    /// Terminal authentication failure
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }

    /// The domain error code, if this is a domain rejection
    pub fn code(&self) -> Option<shared::error::ErrorCode> {
        match self {
            ClientError::Domain(err) => Some(err.code),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

//! Error types for ward-client

use thiserror::Error;

/// Message the API returns when a bearer token is rejected.
pub const AUTH_FAILURE_SENTINEL: &str = "Not authorized, token failed";

/// Message recorded when an operation is attempted without a usable session.
pub const UNAUTHENTICATED_MESSAGE: &str = "User not authenticated";

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Client errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("User not authenticated")]
    Unauthenticated,

    /// Normalized failure from the API or the transport underneath it.
    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    #[error("Operation `{operation}` is not available for {entity}")]
    UnsupportedOperation {
        entity: &'static str,
        operation: &'static str,
    },

    #[error("Record has no `_id` field")]
    MissingId,

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Human-readable message, as shown in a container's error slot.
    pub fn message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the server rejected the bearer token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::Api { message, .. } if message == AUTH_FAILURE_SENTINEL)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Api {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

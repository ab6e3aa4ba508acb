//! Error types for store operations

use thiserror::Error;
use ward_client::Error as ClientError;

pub type Result<T> = std::result::Result<T, OpError>;

/// Outcome of a rejected container operation.
///
/// The message is the same text recorded in the container's `error` slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    /// The server rejected the bearer token. The coordinating layer is expected
    /// to end the session.
    #[error("{0}")]
    AuthErrorDetected(String),

    /// No usable session; nothing was sent.
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Failed(String),
}

impl OpError {
    /// Classify a client error. `invalidates_session` is false for operations
    /// whose failures are a display concern only.
    pub fn from_client(err: &ClientError, invalidates_session: bool) -> Self {
        let message = err.message();
        match err {
            ClientError::Unauthenticated => OpError::Unauthenticated(message),
            e if e.is_auth_failure() && invalidates_session => OpError::AuthErrorDetected(message),
            _ => OpError::Failed(message),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            OpError::AuthErrorDetected(m) | OpError::Unauthenticated(m) | OpError::Failed(m) => m,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, OpError::AuthErrorDetected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_client::AUTH_FAILURE_SENTINEL;

    fn api(message: &str) -> ClientError {
        ClientError::Api {
            status: Some(401),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_sentinel_classification_respects_operation() {
        let err = api(AUTH_FAILURE_SENTINEL);
        assert!(OpError::from_client(&err, true).is_auth_error());
        assert_eq!(
            OpError::from_client(&err, false),
            OpError::Failed(AUTH_FAILURE_SENTINEL.to_string())
        );
    }

    #[test]
    fn test_other_failures() {
        assert_eq!(
            OpError::from_client(&api("Duplicate name"), true),
            OpError::Failed("Duplicate name".to_string())
        );
        assert_eq!(
            OpError::from_client(&ClientError::Unauthenticated, true),
            OpError::Unauthenticated("User not authenticated".to_string())
        );
    }
}

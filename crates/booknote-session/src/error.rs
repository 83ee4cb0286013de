//! Session error types.

use booknote_api::{ApiError, ValidationError};
use thiserror::Error;

/// Session error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// The API rejected the request or could not be reached
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Input rejected before any request was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Invalid state transition in the session FSM
    #[error("Invalid session state transition: {0}")]
    InvalidStateTransition(String),
}

impl AuthError {
    /// Message suitable for showing to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status for API errors (`0` when no response was obtained).
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    /// Returns true if retrying later could succeed.
    ///
    /// Transient errors are transport failures and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            AuthError::Api(e) => e.is_network() || e.status >= 500,
            _ => false,
        }
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;
    use booknote_api::NETWORK_ERROR_MESSAGE;

    #[test]
    fn test_api_message_is_passed_through() {
        let err = AuthError::from(ApiError::new(401, "Invalid credentials", None));
        assert_eq!(err.message(), "Invalid credentials");
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_is_transient_network() {
        let err = AuthError::from(ApiError::network());
        assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
        assert!(err.is_transient());
    }

    #[test]
    fn test_is_transient_server_error() {
        assert!(AuthError::from(ApiError::new(503, "down", None)).is_transient());
    }

    #[test]
    fn test_validation_is_not_transient() {
        let err = AuthError::from(ValidationError::GenreCount);
        assert!(!err.is_transient());
        assert_eq!(err.status(), None);
    }
}

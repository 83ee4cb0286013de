//! API error type.

use serde_json::Value;
use thiserror::Error;

/// Message used when no response was obtained.
pub const NETWORK_ERROR_MESSAGE: &str = "A network error occurred";

/// Message used when an error response carries no `message` field.
pub const DEFAULT_ERROR_MESSAGE: &str = "API request failed";

/// Message used when a success response does not have the expected shape.
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from server";

/// Every failure the gateway can report.
///
/// `status` is the HTTP status of the response, or `0` when the transport
/// failed before any response arrived.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    /// Parsed response body, when there was one.
    pub data: Option<Value>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status,
            message: message.into(),
            data,
        }
    }

    /// Transport failure: no response was obtained.
    pub fn network() -> Self {
        Self::new(0, NETWORK_ERROR_MESSAGE, None)
    }

    /// Build an error from a non-success response and its parsed body.
    pub fn from_response(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string();

        let data = if body.is_null() { None } else { Some(body) };
        Self::new(status, message, data)
    }

    /// Returns true if no response was obtained.
    pub fn is_network(&self) -> bool {
        self.status == 0
    }

    /// Returns true for 401 responses.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::commands::validation::ValidationError;

/// The error payload returned by the platform when it rejects a request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Option<Value>,
    /// The body exactly as it was received
    #[serde(skip)]
    pub raw: String,
}

impl ApiError {
    /// Parse an error body, keeping it as plain text when it isn't the usual JSON object
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<ApiError>(body) {
            Ok(mut error) => {
                error.raw = body.to_string();
                error
            }
            Err(_) => ApiError {
                code: None,
                message: body.trim().to_string(),
                errors: None,
                raw: body.to_string(),
            },
        }
    }
}

/// Every way a registration can fail
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Rejected locally, nothing was sent
    #[error("Invalid registration: {0}")]
    Validation(#[from] ValidationError),
    /// The platform refused the command (4xx), retrying the same request won't help
    #[error("Registration rejected with status {status}: {}", .error.message)]
    Client { status: u16, error: ApiError },
    /// Server error (5xx) or the platform couldn't be reached, the caller may retry
    #[error("Registration failed temporarily: {message}")]
    Transient { status: Option<u16>, message: String },
    /// The platform accepted the command but answered with something unexpected
    #[error("Unexpected response with status {status}: {body}")]
    InvalidResponse { status: u16, body: String },
    #[error("Could not build the HTTP client: {0}")]
    Http(String),
}

impl RegistrationError {
    /// Can the same registration succeed if it is sent again later?
    pub fn is_retryable(&self) -> bool {
        matches!(self, RegistrationError::Transient { .. })
    }

    /// The HTTP status returned by the platform, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistrationError::Client { status, .. }
            | RegistrationError::InvalidResponse { status, .. } => Some(*status),
            RegistrationError::Transient { status, .. } => *status,
            RegistrationError::Validation(_) | RegistrationError::Http(_) => None,
        }
    }
}

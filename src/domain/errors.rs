//! Domain error types
//!
//! Error hierarchy for goform. All errors are domain-specific and don't
//! expose third-party types; reqwest and serde failures are converted at
//! the adapter boundary.

use thiserror::Error;

use crate::form::project::ApiErrorPayload;

/// Main goform error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum GoFormError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// GO API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local validation errors outside the form error tree (bad input files,
    /// malformed session bundles)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session state errors (mutating a finalized session)
    #[error("Session state error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// GO API specific errors
///
/// Errors that occur when talking to the GO server. These don't expose
/// the HTTP client's types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to reach the GO server
    #[error("Failed to connect to GO server: {0}")]
    ConnectionFailed(String),

    /// Authentication failed (401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Response body did not match the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected a submission with a structured error payload.
    /// The payload carries positional field-error paths for projection
    /// back onto the response tree.
    #[error("Submission rejected: {}", .0.message)]
    Rejected(ApiErrorPayload),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx other than a structured rejection)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl ApiError {
    /// Whether a retry of the same request can reasonably succeed.
    ///
    /// Rejections and other 4xx responses are deterministic; retrying them
    /// only repeats the failure.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::ConnectionFailed(_) | ApiError::ServerError { .. } | ApiError::Timeout(_)
        )
    }
}

impl From<std::io::Error> for GoFormError {
    fn from(err: std::io::Error) -> Self {
        GoFormError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GoFormError {
    fn from(err: serde_json::Error) -> Self {
        GoFormError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for GoFormError {
    fn from(err: toml::de::Error) -> Self {
        GoFormError::Configuration(format!("TOML parse error: {err}"))
    }
}

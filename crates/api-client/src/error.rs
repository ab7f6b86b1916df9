//! Error types for the API client
//!
//! Every failed call resolves to an [`ApiError`] whose [`ErrorKind`] comes
//! from a closed taxonomy. Callers show [`ApiError::message`] to the user and
//! never inspect raw transport errors; the original error is kept as the
//! `source` for diagnostics only.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for account flows that also touch the session store
pub type AccountResult<T> = Result<T, AccountError>;

/// Fallback message for a 400 response without a `message` field
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input data";

/// Message for every 401 response
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid email or password. Please try again.";

/// Message for every 409 response
pub const CONFLICT_MESSAGE: &str = "Email already exists";

/// Message for calls that exceed the configured timeout
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please check your server or network.";

/// Message for calls that never received a response
pub const NETWORK_UNAVAILABLE_MESSAGE: &str =
    "Network error, please check your connection and try again";

/// Closed set of failure kinds a call can end in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// HTTP 400
    InvalidInput,
    /// HTTP 401
    Unauthorized,
    /// HTTP 409
    Conflict,
    /// The configured timeout elapsed
    Timeout,
    /// No response was received (DNS, refused connection, reset)
    NetworkUnavailable,
    /// Any other status or transport failure
    Unclassified,
}

impl ErrorKind {
    /// Stable snake_case name, used in logs and JSON output
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Unauthorized => "unauthorized",
            Self::Conflict => "conflict",
            Self::Timeout => "timeout",
            Self::NetworkUnavailable => "network_unavailable",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified call failure
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
            source: None,
        }
    }

    /// A 400 response carrying `message`
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message, Some(400))
    }

    /// A 401 response
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized, UNAUTHORIZED_MESSAGE, Some(401))
    }

    /// A 409 response
    #[must_use]
    pub fn conflict() -> Self {
        Self::new(ErrorKind::Conflict, CONFLICT_MESSAGE, Some(409))
    }

    /// The call exceeded its timeout
    #[must_use]
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout, TIMEOUT_MESSAGE, None)
    }

    /// No response was received
    #[must_use]
    pub fn network_unavailable() -> Self {
        Self::new(ErrorKind::NetworkUnavailable, NETWORK_UNAVAILABLE_MESSAGE, None)
    }

    /// Anything the taxonomy does not name, with the original error text
    pub fn unclassified(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unclassified, message, status)
    }

    /// Attach the underlying error for diagnostics
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Failure kind
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// User-facing message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, when a response was received
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Whether a caller-driven retry could plausibly succeed
    ///
    /// The client itself never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            ErrorKind::Timeout | ErrorKind::NetworkUnavailable => true,
            ErrorKind::Unclassified => self.status.is_some_and(|s| s >= 500 || s == 429),
            ErrorKind::InvalidInput | ErrorKind::Unauthorized | ErrorKind::Conflict => false,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status.is_some_and(|s| (400..500).contains(&s))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status.is_some_and(|s| s >= 500)
    }
}

/// Errors raised while building a client
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Invalid(String),

    /// The underlying HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl ConfigError {
    /// Create an invalid-configuration error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Errors from account flows (login, signup, logout)
#[derive(Error, Debug)]
pub enum AccountError {
    /// The API call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The call succeeded but the session store could not be updated
    #[error("Failed to update session: {0}")]
    Session(#[from] pressureguard_core::Error),
}

impl AccountError {
    /// The classified API error, if this failure came from the API
    #[must_use]
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            Self::Session(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_messages() {
        assert_eq!(ApiError::unauthorized().to_string(), UNAUTHORIZED_MESSAGE);
        assert_eq!(ApiError::conflict().to_string(), CONFLICT_MESSAGE);
        assert_eq!(ApiError::timeout().to_string(), TIMEOUT_MESSAGE);
        assert_eq!(
            ApiError::network_unavailable().to_string(),
            NETWORK_UNAVAILABLE_MESSAGE
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::invalid_input("x").status(), Some(400));
        assert_eq!(ApiError::unauthorized().status(), Some(401));
        assert_eq!(ApiError::conflict().status(), Some(409));
        assert_eq!(ApiError::timeout().status(), None);
        assert_eq!(ApiError::network_unavailable().status(), None);
    }

    #[test]
    fn test_is_retryable() {
        assert!(ApiError::timeout().is_retryable());
        assert!(ApiError::network_unavailable().is_retryable());
        assert!(ApiError::unclassified(Some(503), "x").is_retryable());
        assert!(!ApiError::unclassified(Some(404), "x").is_retryable());
        assert!(!ApiError::unclassified(None, "x").is_retryable());
        assert!(!ApiError::unauthorized().is_retryable());
        assert!(!ApiError::invalid_input("x").is_retryable());
    }

    #[test]
    fn test_client_and_server_errors() {
        assert!(ApiError::conflict().is_client_error());
        assert!(!ApiError::conflict().is_server_error());
        assert!(ApiError::unclassified(Some(500), "x").is_server_error());
        assert!(!ApiError::timeout().is_client_error());
    }

    #[test]
    fn test_source_is_kept() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::network_unavailable().with_source(io);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "refused");
        assert_eq!(err.to_string(), NETWORK_UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::NetworkUnavailable.to_string(), "network_unavailable");
        assert_eq!(
            serde_json::to_value(ErrorKind::InvalidInput).unwrap(),
            serde_json::json!("invalid_input")
        );
    }

    #[test]
    fn test_account_error_as_api() {
        let err: AccountError = ApiError::conflict().into();
        assert_eq!(err.as_api().map(ApiError::kind), Some(ErrorKind::Conflict));
        assert_eq!(err.to_string(), CONFLICT_MESSAGE);

        let err: AccountError = pressureguard_core::Error::store_write("disk full").into();
        assert!(err.as_api().is_none());
    }
}

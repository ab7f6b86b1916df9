//! Errors raised by the local side of the client
//!
//! Configuration files and the session store fail with an [`Error`] that
//! carries a stable [`ErrorCode`], optional context and a suggestion for the
//! user. [`Error::to_report`] gives the serializable form the CLI prints in
//! JSON mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Stable error codes, grouped by thousands: 1xxx internal, 2xxx filesystem,
/// 3xxx configuration, 4xxx session store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Internal = 1001,

    Io = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    ConfigRead = 3000,
    ConfigNotFound = 3001,
    ConfigParse = 3002,

    StoreWrite = 4000,
    StoreCorrupt = 4001,
}

impl ErrorCode {
    /// Numeric value
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Category name, as shown in reports
    pub fn category(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Io | Self::FileNotFound | Self::PermissionDenied => "filesystem",
            Self::ConfigRead | Self::ConfigNotFound | Self::ConfigParse => "configuration",
            Self::StoreWrite | Self::StoreCorrupt => "session_store",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Local failure with code, context and suggestion
#[derive(Error, Debug)]
pub struct Error {
    /// Stable code
    pub code: ErrorCode,
    /// What went wrong
    pub message: String,
    /// Where it went wrong
    pub context: Option<String>,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Underlying error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({ctx})")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create an error with `code` and `message`
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Say where the error happened
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Tell the user how to recover
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Keep the underlying error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Serializable form
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code.to_string(),
            category: self.code.category(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
        }
    }

    pub fn config_read(path: impl AsRef<Path>, cause: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ConfigRead,
            format!("Failed to read config file {}: {cause}", path.as_ref().display()),
        )
    }

    pub fn config_not_found(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a pressureguard.toml file or use --config to specify a path")
    }

    pub fn store_write(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreWrite, message)
    }

    pub fn store_corrupt(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::StoreCorrupt,
            format!("Session store is corrupt: {}", path.as_ref().display()),
        )
        .with_suggestion("Delete the file and log in again")
    }

    pub fn lock_poisoned() -> Self {
        Self::new(ErrorCode::Internal, "Session store lock poisoned")
    }
}

/// JSON shape of an [`Error`]
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorReport {
    pub code: String,
    pub category: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::Io,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::store_write(format!("Failed to encode session store: {err}")).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParse, format!("TOML parse error: {err}")).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_render_with_prefix() {
        assert_eq!(ErrorCode::Internal.to_string(), "E1001");
        assert_eq!(ErrorCode::StoreWrite.to_string(), "E4000");
    }

    #[test]
    fn test_category_matches_thousands_group() {
        assert_eq!(ErrorCode::Internal.category(), "internal");
        assert_eq!(ErrorCode::Io.category(), "filesystem");
        assert_eq!(ErrorCode::ConfigParse.category(), "configuration");
        assert_eq!(ErrorCode::StoreCorrupt.category(), "session_store");

        for code in [ErrorCode::ConfigRead, ErrorCode::StoreWrite, ErrorCode::PermissionDenied] {
            let expected = match code.code() / 1000 {
                2 => "filesystem",
                3 => "configuration",
                _ => "session_store",
            };
            assert_eq!(code.category(), expected);
        }
    }

    #[test]
    fn test_display_includes_context_and_suggestion() {
        let err = Error::config_not_found("/etc/pressureguard.toml").with_context("loading settings");
        let text = err.to_string();

        assert!(text.starts_with("[E3001] Configuration file not found: /etc/pressureguard.toml"));
        assert!(text.contains("(loading settings)"));
        assert!(text.contains("Suggestion: Create a pressureguard.toml"));
    }

    #[test]
    fn test_io_error_codes() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.source.is_some());

        let err: Error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no").into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        let err: Error = std::io::Error::other("disk on fire").into();
        assert_eq!(err.code, ErrorCode::Io);
    }

    #[test]
    fn test_report() {
        let report = Error::store_corrupt("/tmp/session.json").to_report();
        assert_eq!(report.code, "E4001");
        assert_eq!(report.category, "session_store");
        assert_eq!(report.suggestion.as_deref(), Some("Delete the file and log in again"));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("context").is_none());
    }
}

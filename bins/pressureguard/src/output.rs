//! Terminal output utilities

use anyhow::Error;
use owo_colors::OwoColorize;
use pressureguard_api_client::{AccountError, ApiError};
use pressureguard_core::Error as CoreError;
use serde::Serialize;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a banner
    pub fn banner(title: &str) {
        println!();
        println!("{}", RULE.blue());
        println!("  {}", title.blue().bold());
        println!("{}", RULE.blue());
        println!();
    }

    /// Print an aligned `label: value` line
    pub fn field(label: &str, value: &str) {
        println!("  {:<14} {}", format!("{label}:").dimmed(), value);
    }
}

/// Pretty-print any serializable value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// JSON shape of a failed command
#[derive(Debug, Serialize, PartialEq)]
pub struct JsonError {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// The classified API error behind a command failure, if any
fn api_error(error: &Error) -> Option<&ApiError> {
    error
        .downcast_ref::<ApiError>()
        .or_else(|| error.downcast_ref::<AccountError>().and_then(AccountError::as_api))
}

/// The configuration or session store error behind a command failure, if any
fn local_error(error: &Error) -> Option<&CoreError> {
    error.downcast_ref::<CoreError>().or_else(|| {
        error.downcast_ref::<AccountError>().and_then(|e| match e {
            AccountError::Session(inner) => Some(inner),
            AccountError::Api(_) => None,
        })
    })
}

impl JsonError {
    /// Build from any command error, keeping the API classification when there is one
    pub fn from_error(error: &Error) -> Self {
        if let Some(api) = api_error(error) {
            return Self {
                kind: api.kind().as_str().to_string(),
                message: api.message().to_string(),
                status: api.status(),
                code: None,
                suggestion: None,
            };
        }

        if let Some(local) = local_error(error) {
            let report = local.to_report();
            return Self {
                kind: report.category.to_string(),
                message: report.message,
                status: None,
                code: Some(report.code),
                suggestion: report.suggestion,
            };
        }

        Self {
            kind: "cli".to_string(),
            message: format!("{error:#}"),
            status: None,
            code: None,
            suggestion: None,
        }
    }
}

/// Human-readable text for a command failure
///
/// API failures show only their user-facing message. Transport details go
/// to the debug log.
pub fn error_text(error: &Error) -> String {
    if let Some(api) = api_error(error) {
        return api.message().to_string();
    }
    match local_error(error) {
        Some(local) => {
            let top = error.to_string();
            let local = local.to_string();
            if top.contains(&local) {
                top
            } else {
                format!("{top}: {local}")
            }
        }
        None => format!("{error:#}"),
    }
}

/// Report a command failure in the requested format
pub fn report_error(error: &Error, format: &str) {
    if format == "json" {
        let body = serde_json::json!({ "error": JsonError::from_error(error) });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
        );
        return;
    }
    eprintln!("{} {}", "Error:".red().bold(), error_text(error));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressureguard_api_client::ErrorKind;

    #[test]
    fn test_json_error_from_api_error() {
        let err = Error::new(ApiError::conflict());
        let json = JsonError::from_error(&err);
        assert_eq!(json.kind, ErrorKind::Conflict.as_str());
        assert_eq!(json.message, "Email already exists");
        assert_eq!(json.status, Some(409));
    }

    #[test]
    fn test_json_error_from_account_error() {
        let err = Error::new(AccountError::from(ApiError::unauthorized()));
        let json = JsonError::from_error(&err);
        assert_eq!(json.kind, "unauthorized");
    }

    #[test]
    fn test_json_error_from_local_error() {
        let err = anyhow::Error::new(CoreError::store_corrupt("/tmp/session.json"))
            .context("Failed to open session file /tmp/session.json");
        let json = JsonError::from_error(&err);
        assert_eq!(json.kind, "session_store");
        assert_eq!(json.code.as_deref(), Some("E4001"));
        assert_eq!(json.message, "Session store is corrupt: /tmp/session.json");
        assert_eq!(json.suggestion.as_deref(), Some("Delete the file and log in again"));
        assert_eq!(json.status, None);

        let err = Error::new(AccountError::from(CoreError::store_write("disk full")));
        let json = JsonError::from_error(&err);
        assert_eq!(json.kind, "session_store");
        assert_eq!(json.code.as_deref(), Some("E4000"));
    }

    #[test]
    fn test_error_text_hides_transport_detail() {
        let source = std::io::Error::other("error sending request for url (http://127.0.0.1:9/)");
        let err = Error::new(ApiError::network_unavailable().with_source(source));
        assert_eq!(
            error_text(&err),
            "Network error, please check your connection and try again"
        );

        let err = Error::new(AccountError::from(ApiError::unauthorized()));
        assert_eq!(error_text(&err), "Invalid email or password. Please try again.");
    }

    #[test]
    fn test_error_text_for_local_and_cli_errors() {
        let err = anyhow::Error::new(CoreError::config_not_found("/etc/pg.toml"))
            .context("Failed to load configuration");
        let text = error_text(&err);
        assert!(text.starts_with("Failed to load configuration: [E3001]"));
        assert!(text.contains("Suggestion:"));

        let err = anyhow::anyhow!("inner").context("outer");
        assert_eq!(error_text(&err), "outer: inner");
    }

    #[test]
    fn test_json_error_from_other_error() {
        let err = anyhow::anyhow!("no base url");
        let json = JsonError::from_error(&err);
        assert_eq!(json.kind, "cli");
        assert_eq!(json.message, "no base url");
        assert_eq!(json.status, None);
    }
}

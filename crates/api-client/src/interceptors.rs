//! The two stages wrapped around every network call
//!
//! - Outbound: [`decorate_request`] attaches `Authorization: Bearer <token>`
//!   to envelopes whose path is not public.
//! - Inbound: [`classify_failure`] maps a [`TransportFailure`] onto the
//!   closed [`ErrorKind`](crate::error::ErrorKind) taxonomy.
//!
//! Both are pure. The only effectful piece is [`read_session_token`], which
//! runs the store read on the blocking pool and never fails.

use crate::endpoints::is_public_path;
use crate::error::{ApiError, INVALID_INPUT_MESSAGE};
use pressureguard_core::storage::{KeyValueStore, AUTH_TOKEN_KEY};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outbound unit of work
///
/// Built per call; decorated once by [`decorate_request`].
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL, or an absolute URL on another origin
    pub path: String,
    /// Optional JSON body
    pub body: Option<Value>,
    /// Headers, starting with `Content-Type: application/json`
    pub headers: HeaderMap,
}

impl RequestEnvelope {
    /// Create an envelope with the default JSON content type
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            method,
            path: path.into(),
            body: None,
            headers,
        }
    }

    /// Attach a JSON body
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Merge caller headers, overriding defaults with the same name
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in &headers {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    /// Whether the path is in the public-endpoint set
    #[must_use]
    pub fn is_public(&self) -> bool {
        is_public_path(&self.path)
    }

    /// Current `Authorization` header value, if any
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Outbound stage
///
/// The stage owns the `Authorization` header: any caller-supplied value is
/// dropped, then a bearer token is attached iff the path is not public and
/// `token` is present. Never fails; an unusable token is treated as absent.
#[must_use]
pub fn decorate_request(mut envelope: RequestEnvelope, token: Option<&str>) -> RequestEnvelope {
    envelope.headers.remove(AUTHORIZATION);

    if envelope.is_public() {
        debug!(path = %envelope.path, "Public endpoint, skipping auth");
        return envelope;
    }

    let Some(token) = token.filter(|t| !t.is_empty()) else {
        debug!(path = %envelope.path, "No session token, sending unauthenticated");
        return envelope;
    };

    match HeaderValue::from_str(&format!("Bearer {token}")) {
        Ok(mut value) => {
            value.set_sensitive(true);
            envelope.headers.insert(AUTHORIZATION, value);
        }
        Err(e) => {
            warn!(path = %envelope.path, error = %e, "Session token is not a valid header value, ignoring");
        }
    }

    envelope
}

/// Read the session token, treating every failure as "no token"
pub async fn read_session_token(store: Arc<dyn KeyValueStore>) -> Option<String> {
    let read = tokio::task::spawn_blocking(move || store.get(AUTH_TOKEN_KEY)).await;

    match read {
        Ok(Ok(token)) => token.filter(|t| !t.is_empty()),
        Ok(Err(e)) => {
            warn!(error = %e, "Failed to read session token, continuing without it");
            None
        }
        Err(e) => {
            warn!(error = %e, "Session token read task failed, continuing without it");
            None
        }
    }
}

/// What went wrong on the wire, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// A non-2xx response was received
    Status { status: u16, body: String },
    /// The configured timeout elapsed
    TimedOut { detail: String },
    /// No usable response (DNS, refused or reset connection, body cut off)
    NoResponse { detail: String },
    /// Anything else (malformed URL, redirect loop)
    Other { detail: String },
}

impl TransportFailure {
    /// Describe a `reqwest` error
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        let detail = err.to_string();
        if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                body: String::new(),
            }
        } else if err.is_timeout() {
            Self::TimedOut { detail }
        } else if err.is_connect() || err.is_request() || err.is_body() {
            Self::NoResponse { detail }
        } else {
            Self::Other { detail }
        }
    }

    /// HTTP status, when a response was received
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, .. } => write!(f, "Request failed with status code {status}"),
            Self::TimedOut { detail } | Self::NoResponse { detail } | Self::Other { detail } => {
                f.write_str(detail)
            }
        }
    }
}

/// Inbound stage for the failure path
#[must_use]
pub fn classify_failure(failure: &TransportFailure) -> ApiError {
    match failure {
        TransportFailure::Status { status: 400, body } => {
            ApiError::invalid_input(server_message(body).unwrap_or_else(|| INVALID_INPUT_MESSAGE.to_string()))
        }
        TransportFailure::Status { status: 401, .. } => ApiError::unauthorized(),
        TransportFailure::Status { status: 409, .. } => ApiError::conflict(),
        TransportFailure::Status { status, .. } => {
            ApiError::unclassified(Some(*status), failure.to_string())
        }
        TransportFailure::TimedOut { .. } => ApiError::timeout(),
        TransportFailure::NoResponse { .. } => ApiError::network_unavailable(),
        TransportFailure::Other { detail } => ApiError::unclassified(None, detail.clone()),
    }
}

/// Non-empty string `message` field of a JSON error body
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Inbound stage for the success path: the body, passed through
///
/// An empty body becomes `null`; a non-JSON body becomes a JSON string.
#[must_use]
pub fn passthrough_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Per-call lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// Envelope built
    Created,
    /// Outbound stage applied
    Decorated,
    /// Waiting on the network
    InFlight,
    /// 2xx received
    Succeeded,
    /// Classified failure
    Failed(crate::error::ErrorKind),
}

impl CallState {
    /// `Succeeded` and `Failed` are terminal
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Decorated => f.write_str("decorated"),
            Self::InFlight => f.write_str("in_flight"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed(kind) => write!(f, "failed({kind})"),
        }
    }
}

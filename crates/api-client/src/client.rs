//! Transport client: one configured HTTP client, two interceptor stages

use crate::config::ClientConfig;
use crate::endpoints::{EndpointRegistry, UsersApi};
use crate::error::{ApiError, ApiResult, ConfigError};
use crate::interceptors::{
    classify_failure, decorate_request, passthrough_body, read_session_token, CallState,
    RequestEnvelope, TransportFailure,
};
use pressureguard_core::storage::{KeyValueStore, MemoryStore};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, trace, warn, Span};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// PressureGuard API client
///
/// Cheap to clone; clones share the connection pool, configuration and
/// session store. Holds no mutable per-call state, so concurrent calls do
/// not affect each other.
///
/// Every call goes through:
/// 1. The outbound stage: read the session token, decorate the envelope
/// 2. A single network attempt bounded by the configured timeout
/// 3. The inbound stage: pass 2xx bodies through, classify everything else
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    config: Arc<ClientConfig>,
    endpoints: Arc<EndpointRegistry>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client reading the session token from `store`
    pub fn new(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ConfigError::invalid("user_agent is not a valid header value"))?;
        default_headers.insert(USER_AGENT, agent);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()?;

        let endpoints = EndpointRegistry::new(config.base_url.clone());

        Ok(Self {
            inner,
            config: Arc::new(config),
            endpoints: Arc::new(endpoints),
            store,
        })
    }

    /// Create a client with an empty in-memory session store
    pub fn with_config(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// Create a client configured from the environment
    pub fn from_env(store: Arc<dyn KeyValueStore>) -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?, store)
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Endpoint registry rooted at this client's base URL
    #[must_use]
    pub fn endpoints(&self) -> &EndpointRegistry {
        &self.endpoints
    }

    /// Session store shared with the account flows
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Access user-account endpoints
    #[must_use]
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Typed helpers
    // -------------------------------------------------------------------------

    /// Perform a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let value = self.send(path, Method::GET, None, None).await?;
        decode(value)
    }

    /// Perform a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let value = self.send(path, Method::POST, Some(encode(body)?), None).await?;
        decode(value)
    }

    /// Perform a PATCH request with a JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let value = self.send(path, Method::PATCH, Some(encode(body)?), None).await?;
        decode(value)
    }

    /// Perform a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let value = self.send(path, Method::DELETE, None, None).await?;
        decode(value)
    }

    // -------------------------------------------------------------------------
    // Pipeline
    // -------------------------------------------------------------------------

    /// Send one request and return the response body
    ///
    /// `path` is relative to the base URL (`/api/users/getMe`) or an absolute
    /// URL; absolute URLs on the base origin are reduced to their path before
    /// the public-endpoint check.
    pub async fn send(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
        headers: Option<HeaderMap>,
    ) -> ApiResult<Value> {
        let mut envelope = RequestEnvelope::new(method, self.relative_path(path));
        if let Some(body) = body {
            envelope = envelope.with_body(body);
        }
        if let Some(headers) = headers {
            envelope = envelope.with_headers(headers);
        }
        self.execute(envelope).await
    }

    /// Run an envelope through the full pipeline
    #[instrument(
        name = "api_call",
        skip(self, envelope),
        fields(
            method = %envelope.method,
            path = %envelope.path,
            request_id = tracing::field::Empty,
            state = tracing::field::Empty,
        )
    )]
    pub async fn execute(&self, envelope: RequestEnvelope) -> ApiResult<Value> {
        let request_id = Uuid::new_v4().to_string();
        let span = Span::current();
        span.record("request_id", request_id.as_str());
        record_state(&span, CallState::Created);

        let envelope = self.decorate(envelope).await;
        record_state(&span, CallState::Decorated);

        let url = self.url_for(&envelope.path);
        let path = envelope.path.clone();

        let mut request = self
            .inner
            .request(envelope.method, &url)
            .headers(envelope.headers)
            .header(X_REQUEST_ID, &request_id);
        if let Some(ref body) = envelope.body {
            request = request.json(body);
        }

        record_state(&span, CallState::InFlight);
        let start = Instant::now();
        let result = match request.send().await {
            Ok(response) => self.inbound(response, &path).await,
            Err(e) => Err(reject(TransportFailure::from_reqwest(&e), &path, e)),
        };
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(_) => {
                record_state(&span, CallState::Succeeded);
                debug!(elapsed_ms, "Request succeeded");
            }
            Err(e) => {
                record_state(&span, CallState::Failed(e.kind()));
                debug!(elapsed_ms, kind = %e.kind(), "Request failed");
            }
        }

        result
    }

    /// Outbound stage: attach the session token unless the path is public
    ///
    /// The store is not read at all for public paths.
    pub async fn decorate(&self, envelope: RequestEnvelope) -> RequestEnvelope {
        if envelope.is_public() {
            return decorate_request(envelope, None);
        }
        let token = read_session_token(Arc::clone(&self.store)).await;
        decorate_request(envelope, token.as_deref())
    }

    /// Inbound stage for a received response
    async fn inbound(&self, response: Response, path: &str) -> ApiResult<Value> {
        let status = response.status();

        if status.is_success() {
            return match response.bytes().await {
                Ok(body) => Ok(passthrough_body(&body)),
                Err(e) => Err(reject(TransportFailure::from_reqwest(&e), path, e)),
            };
        }

        let body = response.text().await.unwrap_or_default();
        let failure = TransportFailure::Status {
            status: status.as_u16(),
            body,
        };
        let error = classify_failure(&failure);
        log_failure(&failure, &error, path);
        Err(error)
    }

    /// Reduce an absolute URL on the base origin to its path
    fn relative_path(&self, path: &str) -> String {
        match path.strip_prefix(self.base_url()) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => path.to_string(),
        }
    }

    /// Absolute URL for a relative path; absolute URLs pass through
    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url(), path)
        } else {
            format!("{}/{}", self.base_url(), path)
        }
    }
}

fn record_state(span: &Span, state: CallState) {
    span.record("state", tracing::field::display(state));
    trace!(%state, "Call state changed");
}

/// Classify a transport error, log it and keep it as the source
fn reject(failure: TransportFailure, path: &str, source: reqwest::Error) -> ApiError {
    let error = classify_failure(&failure);
    log_failure(&failure, &error, path);
    error.with_source(source)
}

fn log_failure(failure: &TransportFailure, error: &ApiError, path: &str) {
    let body = match failure {
        TransportFailure::Status { body, .. } => body.as_str(),
        _ => "",
    };
    warn!(
        path = %path,
        status = ?failure.status(),
        kind = %error.kind(),
        response = %body,
        "Response error"
    );
    debug!(path = %path, error = %failure, "Transport failure detail");
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| {
        ApiError::unclassified(None, format!("Failed to encode request body: {e}")).with_source(e)
    })
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| {
        ApiError::unclassified(None, format!("Failed to decode response body: {e}")).with_source(e)
    })
}

//! Configuration for the PressureGuard API client
//!
//! The base URL has no built-in default: it must be supplied explicitly or
//! through `PRESSUREGUARD_API_URL`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API origin
pub const API_URL_ENV: &str = "PRESSUREGUARD_API_URL";

/// Environment variable overriding the timeout, in seconds
pub const TIMEOUT_ENV: &str = "PRESSUREGUARD_TIMEOUT_SECS";

const DEFAULT_USER_AGENT: &str = concat!("pressureguard-api-client/", env!("CARGO_PKG_VERSION"));

/// Client configuration, fixed once the client is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Origin of the REST API, e.g. `http://10.0.0.5:3000`
    pub base_url: String,
    /// Upper bound for a single call, connection through body
    #[serde(with = "duration_millis", rename = "timeout_ms")]
    pub timeout: Duration,
    /// `User-Agent` sent with every request
    pub user_agent: String,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        u64::try_from(duration.as_millis())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl ClientConfig {
    /// Create a configuration for `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads:
    /// - `PRESSUREGUARD_API_URL`: API origin (required)
    /// - `PRESSUREGUARD_TIMEOUT_SECS`: request timeout in seconds (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(API_URL_ENV.to_string()))?;

        let mut config = Self::new(base_url);

        if let Ok(raw) = env::var(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::invalid(format!("{TIMEOUT_ENV} must be a whole number of seconds, got {raw:?}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(url.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::invalid("base_url cannot be empty"));
        }

        let Some((_, rest)) = self.base_url.split_once("://") else {
            return Err(ConfigError::invalid("base_url must start with http:// or https://"));
        };

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::invalid("base_url must start with http:// or https://"));
        }

        if rest.is_empty() {
            return Err(ConfigError::invalid("base_url must include a host"));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::invalid("timeout cannot be zero"));
        }

        Ok(())
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

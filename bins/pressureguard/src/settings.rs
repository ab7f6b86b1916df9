//! Resolved settings for a CLI run
//!
//! Precedence, highest first: command-line flags and their environment
//! variables, then `pressureguard.toml`, then built-in defaults. The API
//! base URL has no default.

use anyhow::{bail, Context, Result};
use pressureguard_api_client::config::API_URL_ENV;
use pressureguard_api_client::ClientConfig;
use pressureguard_core::config::Config;
use pressureguard_core::storage::default_store_path;
use pressureguard_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Values taken from global flags
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub session_file: Option<PathBuf>,
    pub verbose: bool,
}

/// Everything a command needs to build a client
#[derive(Debug, Clone)]
pub struct Settings {
    file: Config,
    overrides: Overrides,
}

impl Settings {
    /// Load the configuration file and remember the overrides
    pub fn load(overrides: Overrides) -> Result<Self> {
        let file =
            Config::load(overrides.config.as_deref()).context("Failed to load configuration")?;
        Ok(Self { file, overrides })
    }

    /// Logging configuration
    pub fn telemetry(&self) -> TelemetryConfig {
        if self.overrides.verbose {
            return TelemetryConfig::verbose().with_json(self.file.schema.logging.json);
        }
        TelemetryConfig::default()
            .with_level(self.file.schema.logging.level.clone())
            .with_json(self.file.schema.logging.json)
    }

    /// Client configuration; fails when no base URL is configured anywhere
    pub fn client_config(&self) -> Result<ClientConfig> {
        let Some(base_url) = self
            .overrides
            .base_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| self.file.schema.api.base_url.clone())
        else {
            bail!(
                "No API base URL configured. Pass --base-url, set {API_URL_ENV}, \
                 or add `base_url` under [api] in pressureguard.toml"
            );
        };

        let timeout_secs = self
            .overrides
            .timeout_secs
            .unwrap_or(self.file.schema.api.timeout_secs);

        Ok(ClientConfig::new(base_url).with_timeout(Duration::from_secs(timeout_secs)))
    }

    /// Location of the session store
    pub fn session_file(&self) -> PathBuf {
        self.overrides
            .session_file
            .clone()
            .or_else(|| self.file.store_path())
            .unwrap_or_else(default_store_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(overrides: Overrides) -> Settings {
        Settings {
            file: Config::defaults(),
            overrides,
        }
    }

    #[test]
    fn test_missing_base_url_is_an_error() {
        let err = settings(Overrides::default()).client_config().unwrap_err();
        assert!(err.to_string().contains(API_URL_ENV));
    }

    #[test]
    fn test_flag_wins_over_file() {
        let mut s = settings(Overrides {
            base_url: Some("http://flag:3000".into()),
            ..Overrides::default()
        });
        s.file.schema.api.base_url = Some("http://file:3000".into());
        s.file.schema.api.timeout_secs = 7;

        let config = s.client_config().unwrap();
        assert_eq!(config.base_url, "http://flag:3000");
        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_file_base_url_and_timeout_override() {
        let mut s = settings(Overrides {
            timeout_secs: Some(3),
            ..Overrides::default()
        });
        s.file.schema.api.base_url = Some("http://file:3000/".into());

        let config = s.client_config().unwrap();
        assert_eq!(config.base_url, "http://file:3000");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_session_file_precedence() {
        let s = settings(Overrides {
            session_file: Some(PathBuf::from("/tmp/flag.json")),
            ..Overrides::default()
        });
        assert_eq!(s.session_file(), PathBuf::from("/tmp/flag.json"));

        let s = settings(Overrides::default());
        assert_eq!(s.session_file(), default_store_path());
    }

    #[test]
    fn test_verbose_logging() {
        let s = settings(Overrides {
            verbose: true,
            ..Overrides::default()
        });
        assert!(s.telemetry().log_level.contains("debug"));
        assert_eq!(settings(Overrides::default()).telemetry().log_level, "warn");
    }
}

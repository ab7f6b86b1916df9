//! CLI command implementations

pub mod account;
pub mod endpoints;
pub mod request;

use crate::settings::Settings;
use anyhow::{Context as _, Result};
use pressureguard_api_client::ApiClient;
use pressureguard_core::storage::FileStore;
use std::sync::Arc;
use tracing::debug;

/// Shared state handed to every command
pub struct Context {
    pub settings: Settings,
    pub format: String,
}

impl Context {
    pub fn new(settings: Settings, format: impl Into<String>) -> Self {
        Self {
            settings,
            format: format.into(),
        }
    }

    /// Whether output should be machine-readable
    pub fn json(&self) -> bool {
        self.format == "json"
    }

    /// Build a client backed by the on-disk session store
    pub fn client(&self) -> Result<ApiClient> {
        let config = self.settings.client_config()?;
        let path = self.settings.session_file();
        debug!(session_file = %path.display(), base_url = %config.base_url, "opening session");

        let store = FileStore::open(&path)
            .with_context(|| format!("Failed to open session file {}", path.display()))?;

        Ok(ApiClient::new(config, Arc::new(store))?)
    }
}

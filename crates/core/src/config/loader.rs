//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit `path` must exist. Without one, the standard locations
    /// are searched and defaults are used when none is found.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load with defaults only (no file)
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Session store path from the file, if configured
    pub fn store_path(&self) -> Option<PathBuf> {
        self.schema
            .session
            .store_path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let mut candidates = vec![
        PathBuf::from("pressureguard.toml"),
        PathBuf::from(".pressureguard.toml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("pressureguard").join("config.toml"));
    }

    candidates
        .into_iter()
        .find(|candidate| candidate.exists())
        .map(|p| p.to_string_lossy().into_owned())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config_read(path, &e).with_source(e))?;

    toml::from_str(&content)
        .map_err(|e| Error::from(e).with_context(format!("While parsing {path}")))
}

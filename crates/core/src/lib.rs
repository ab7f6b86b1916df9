//! Core utilities for the PressureGuard client
//!
//! This crate provides functionality shared by the API client and the CLI:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Storage**: Persisted key-value store holding the session token
//! - **Configuration**: TOML-based configuration with defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use pressureguard_core::config::Config;
//! use pressureguard_core::storage::{FileStore, KeyValueStore, AUTH_TOKEN_KEY};
//!
//! let config = Config::load(None).expect("Invalid configuration");
//! let store = match config.store_path() {
//!     Some(path) => FileStore::open(path),
//!     None => FileStore::open_default(),
//! }
//! .expect("Failed to open session store");
//!
//! if store.get(AUTH_TOKEN_KEY).ok().flatten().is_none() {
//!     eprintln!("Not logged in");
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod storage;

pub use error::{Error, ErrorCode, ErrorReport, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCode, Result};
    pub use crate::storage::{FileStore, KeyValueStore, MemoryStore, AUTH_TOKEN_KEY};
}

//! Authenticated API client for the PressureGuard backend
//!
//! One explicitly constructed [`ApiClient`] serves every caller. Each call
//! passes through a fixed two-stage pipeline:
//!
//! - **Outbound**: attach `Authorization: Bearer <token>` from the session
//!   store, unless the path is a public endpoint (signup, login,
//!   forgot-password). A storage failure means "no token", never an error.
//! - **Inbound**: pass 2xx bodies through; classify everything else into a
//!   closed [`ErrorKind`] taxonomy with a user-facing message.
//!
//! Calls are single-attempt and bounded by a 30 second timeout by default.
//!
//! # Example
//!
//! ```rust,no_run
//! use pressureguard_api_client::{ApiClient, ClientConfig};
//! use pressureguard_api_client::endpoints::users::LoginRequest;
//! use pressureguard_core::storage::FileStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileStore::open_default()?);
//!     let client = ApiClient::new(ClientConfig::new("http://10.0.0.5:3000"), store)?;
//!
//!     let login = LoginRequest {
//!         email: "mona@example.com".into(),
//!         password: "s3cretpass".into(),
//!     };
//!     client.users().login(&login).await?;
//!
//!     match client.users().get_me().await {
//!         Ok(user) => println!("Hello, {}", user.name),
//!         Err(e) => eprintln!("{}", e.message()),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod interceptors;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use endpoints::{Endpoint, EndpointRegistry};
pub use error::{AccountError, AccountResult, ApiError, ApiResult, ConfigError, ErrorKind};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::ApiClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{Endpoint, EndpointRegistry, UsersApi};
    pub use crate::error::{AccountError, ApiError, ApiResult, ConfigError, ErrorKind};
    pub use crate::interceptors::{RequestEnvelope, TransportFailure};
}

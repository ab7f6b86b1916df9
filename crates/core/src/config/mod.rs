//! Configuration loading and schema definitions
//!
//! Shared configuration types for the client library and the CLI.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;

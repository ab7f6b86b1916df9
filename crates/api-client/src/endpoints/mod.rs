//! Endpoint registry and typed endpoint groups
//!
//! | Module | Routes | Description |
//! |--------|--------|-------------|
//! | `registry` | all | Logical names, absolute URLs, public-endpoint set |
//! | `users` | `/api/users/*` | Signup, login, profile, logout, password reset |

pub mod registry;
pub mod users;

pub use registry::{is_public_path, Endpoint, EndpointRegistry, PUBLIC_PATHS};
pub use users::UsersApi;

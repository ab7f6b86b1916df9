//! Logical endpoint names and their absolute URLs

use serde::Serialize;
use std::fmt;

/// Logical operations exposed by the PressureGuard API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Endpoint {
    /// Create an account
    Signup,
    /// Exchange credentials for a session token
    Login,
    /// Request a password-reset email
    ForgotPassword,
    /// Set a new password with an emailed token
    ResetPassword,
    /// Signed-in profile
    GetMe,
    /// Profile update
    UpdateMe,
    /// End the session
    Logout,
}

impl Endpoint {
    /// Every endpoint, in registry order
    pub const ALL: [Endpoint; 7] = [
        Endpoint::Signup,
        Endpoint::Login,
        Endpoint::ForgotPassword,
        Endpoint::ResetPassword,
        Endpoint::GetMe,
        Endpoint::UpdateMe,
        Endpoint::Logout,
    ];

    /// Path relative to the base URL
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Signup => "/api/users/signup",
            Self::Login => "/api/users/login",
            Self::ForgotPassword => "/api/users/forgotPassword",
            Self::ResetPassword => "/api/users/resetPassword",
            Self::GetMe => "/api/users/getMe",
            Self::UpdateMe => "/api/users/updateMe",
            Self::Logout => "/api/users/logout",
        }
    }

    /// Registry key, e.g. `FORGOT_PASSWORD`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Signup => "SIGNUP",
            Self::Login => "LOGIN",
            Self::ForgotPassword => "FORGOT_PASSWORD",
            Self::ResetPassword => "RESET_PASSWORD",
            Self::GetMe => "GET_ME",
            Self::UpdateMe => "UPDATE_ME",
            Self::Logout => "LOGOUT",
        }
    }

    /// Whether requests to this endpoint are sent without a bearer token
    #[must_use]
    pub fn is_public(self) -> bool {
        is_public_path(self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Paths that never carry an `Authorization` header
pub const PUBLIC_PATHS: [&str; 3] = [
    Endpoint::Signup.path(),
    Endpoint::Login.path(),
    Endpoint::ForgotPassword.path(),
];

/// Exact-match check against [`PUBLIC_PATHS`]
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Absolute URLs for every [`Endpoint`], built from one base URL
///
/// Immutable once built; switching environments means building a new
/// registry. The base URL is not validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRegistry {
    base_url: String,
}

impl EndpointRegistry {
    /// Build a registry rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `endpoint`
    #[must_use]
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// All `(endpoint, url)` pairs in registry order
    pub fn iter(&self) -> impl Iterator<Item = (Endpoint, String)> + '_ {
        Endpoint::ALL.into_iter().map(|e| (e, self.url(e)))
    }
}

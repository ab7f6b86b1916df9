//! User-account endpoints
//!
//! Maps to the `/api/users/*` routes:
//! - Sign up and log in (public, store the returned session token)
//! - Fetch and update the signed-in profile
//! - Log out (always clears the local session)
//! - Forgot / reset password

use super::registry::Endpoint;
use crate::client::ApiClient;
use crate::error::{AccountResult, ApiResult};
use chrono::NaiveDate;
use pressureguard_core::storage::{AUTH_TOKEN_KEY, USER_NAME_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{info, warn};

/// Users API interface
#[derive(Clone, Debug)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    /// Create a new users API interface
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create an account
    ///
    /// POST /api/users/signup
    pub async fn signup(&self, request: &SignupRequest) -> AccountResult<AuthResponse> {
        let response: AuthResponse = self.client.post(Endpoint::Signup.path(), request).await?;
        if let Some(ref token) = response.token {
            self.store_session(token, &request.name)?;
        }
        Ok(response)
    }

    /// Log in with email and password
    ///
    /// POST /api/users/login
    pub async fn login(&self, request: &LoginRequest) -> AccountResult<AuthResponse> {
        let response: AuthResponse = self.client.post(Endpoint::Login.path(), request).await?;
        if let Some(ref token) = response.token {
            let name = response
                .user()
                .map(|u| u.name.clone())
                .unwrap_or_default();
            self.store_session(token, &name)?;
        }
        Ok(response)
    }

    /// Fetch the signed-in user's profile
    ///
    /// GET /api/users/getMe
    pub async fn get_me(&self) -> ApiResult<User> {
        let response: UserResponse = self.client.get(Endpoint::GetMe.path()).await?;
        Ok(response.data.user)
    }

    /// Update profile fields
    ///
    /// PATCH /api/users/updateMe
    pub async fn update_me(&self, request: &UpdateMeRequest) -> ApiResult<User> {
        let response: UserResponse = self
            .client
            .patch(Endpoint::UpdateMe.path(), request)
            .await?;
        Ok(response.data.user)
    }

    /// End the session
    ///
    /// POST /api/users/logout. The local session is cleared whether or not
    /// the server call succeeds.
    pub async fn logout(&self) -> AccountResult<()> {
        let result = self
            .client
            .send(Endpoint::Logout.path(), reqwest::Method::POST, None, None)
            .await;

        if let Err(ref e) = result {
            warn!(kind = %e.kind(), error = %e, "Logout request failed, clearing local session anyway");
        }

        let store = self.client.store();
        store.remove(AUTH_TOKEN_KEY)?;
        store.remove(USER_NAME_KEY)?;
        info!("Session cleared");
        Ok(())
    }

    /// Request a password-reset email
    ///
    /// POST /api/users/forgotPassword
    pub async fn forgot_password(&self, email: &str) -> ApiResult<MessageResponse> {
        self.client
            .post(
                Endpoint::ForgotPassword.path(),
                &ForgotPasswordRequest { email },
            )
            .await
    }

    /// Set a new password using the emailed reset token
    ///
    /// PATCH /api/users/resetPassword
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> AccountResult<AuthResponse> {
        let response: AuthResponse = self
            .client
            .patch(Endpoint::ResetPassword.path(), request)
            .await?;
        if let Some(ref token) = response.token {
            let name = response
                .user()
                .map(|u| u.name.clone())
                .unwrap_or_default();
            self.store_session(token, &name)?;
        }
        Ok(response)
    }

    fn store_session(&self, token: &str, name: &str) -> pressureguard_core::Result<()> {
        let store = self.client.store();
        store.set(AUTH_TOKEN_KEY, token)?;
        if !name.is_empty() {
            store.set(USER_NAME_KEY, name)?;
        }
        info!("Session stored");
        Ok(())
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Tracks their own readings
    Patient,
    /// Follows a patient's readings
    Companion,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patient => f.write_str("patient"),
            Self::Companion => f.write_str("companion"),
        }
    }
}

/// Signup payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Account role
    pub role: Role,
    /// Display name, stored locally after signup
    pub name: String,
    /// Login email
    pub email: String,
    /// New password
    pub password: String,
    /// Must equal `password`; checked by the server
    pub password_confirm: String,
    /// Contact phone number
    pub phone: String,
    /// Serialized as `YYYY-MM-DD`
    pub date_of_birth: NaiveDate,
    /// Free-form, as the server accepts it
    pub gender: String,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Partial profile update; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New date of birth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    /// New gender
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl UpdateMeRequest {
    /// True when no field would be sent
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.date_of_birth.is_none()
            && self.gender.is_none()
    }
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

/// Password reset payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Reset token from the email
    pub token: String,
    /// New password
    pub password: String,
    /// Must equal `password`
    pub password_confirm: String,
}

/// A user profile as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-side id (`_id`)
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Login email
    #[serde(default)]
    pub email: String,
    /// Contact phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Account role, when the server sends one
    #[serde(default)]
    pub role: Option<Role>,
    /// ISO date or timestamp, as sent by the server
    #[serde(default)]
    pub date_of_birth: Option<String>,
    /// Gender as stored by the server
    #[serde(default)]
    pub gender: Option<String>,
    /// Profile image URL
    #[serde(default)]
    pub profile_image: Option<String>,
    /// Push notification token
    #[serde(default)]
    pub fcm_token: Option<String>,
}

impl User {
    /// Calendar date of birth, ignoring any time component
    #[must_use]
    pub fn birth_date(&self) -> Option<NaiveDate> {
        let raw = self.date_of_birth.as_deref()?;
        let date_part = raw.split('T').next()?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}

/// `{ "user": ... }` wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    /// The wrapped profile
    pub user: User,
}

/// Response of signup, login and reset-password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// `"success"` on success
    #[serde(default)]
    pub status: Option<String>,
    /// Session token; stored as `authToken` when present
    #[serde(default)]
    pub token: Option<String>,
    /// The signed-in user
    #[serde(default)]
    pub data: Option<UserData>,
}

impl AuthResponse {
    /// The user embedded in the response, if any
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.data.as_ref().map(|d| &d.user)
    }
}

/// Response of getMe and updateMe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// `"success"` on success
    #[serde(default)]
    pub status: Option<String>,
    /// The profile
    pub data: UserData,
}

/// Generic `{ status, message }` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// `"success"` on success
    #[serde(default)]
    pub status: Option<String>,
    /// Human-readable message from the server
    #[serde(default)]
    pub message: Option<String>,
    /// Any other top-level fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

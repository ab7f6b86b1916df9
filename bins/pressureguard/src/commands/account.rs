//! Account commands - signup, login, profile, logout, password reset

use super::Context;
use crate::output::{print_json, Status};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use pressureguard_api_client::endpoints::users::{
    LoginRequest, ResetPasswordRequest, Role, SignupRequest, UpdateMeRequest, User,
};
use serde_json::json;

/// Account role accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Patient,
    Companion,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Patient => Role::Patient,
            RoleArg::Companion => Role::Companion,
        }
    }
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Account role
    #[arg(long, value_enum, default_value = "patient")]
    pub role: RoleArg,

    /// Full name
    #[arg(long)]
    pub name: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Password
    #[arg(long, env = "PRESSUREGUARD_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Password confirmation (defaults to --password)
    #[arg(long)]
    pub password_confirm: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub date_of_birth: NaiveDate,

    /// Gender
    #[arg(long)]
    pub gender: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email address
    #[arg(long)]
    pub email: String,

    /// Password
    #[arg(long, env = "PRESSUREGUARD_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct UpdateMeArgs {
    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// New date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub date_of_birth: Option<NaiveDate>,

    /// New gender
    #[arg(long)]
    pub gender: Option<String>,
}

#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    /// Reset token from the email
    #[arg(long)]
    pub token: String,

    /// New password
    #[arg(long, env = "PRESSUREGUARD_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Password confirmation (defaults to --password)
    #[arg(long)]
    pub password_confirm: Option<String>,
}

/// Create an account and store the session
pub async fn signup(ctx: &Context, args: SignupArgs) -> Result<()> {
    let client = ctx.client()?;
    let password_confirm = args.password_confirm.unwrap_or_else(|| args.password.clone());
    let request = SignupRequest {
        role: args.role.into(),
        name: args.name,
        email: args.email,
        password: args.password,
        password_confirm,
        phone: args.phone,
        date_of_birth: args.date_of_birth,
        gender: args.gender,
    };

    let response = client.users().signup(&request).await?;

    if ctx.json() {
        return print_json(&json!({ "user": response.user() }));
    }
    Status::success(&format!("Account created for {}", request.name));
    Ok(())
}

/// Log in and store the session
pub async fn login(ctx: &Context, args: LoginArgs) -> Result<()> {
    let client = ctx.client()?;
    let request = LoginRequest {
        email: args.email,
        password: args.password,
    };

    let response = client.users().login(&request).await?;

    if ctx.json() {
        return print_json(&json!({ "user": response.user() }));
    }
    let name = response.user().map_or(request.email.as_str(), |u| u.name.as_str());
    Status::success(&format!("Logged in as {name}"));
    Ok(())
}

/// Show the signed-in profile
pub async fn me(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let user = client.users().get_me().await?;

    if ctx.json() {
        return print_json(&user);
    }
    print_user(&user);
    Ok(())
}

/// Update profile fields
pub async fn update_me(ctx: &Context, args: UpdateMeArgs) -> Result<()> {
    let request = UpdateMeRequest {
        name: args.name,
        phone: args.phone,
        date_of_birth: args.date_of_birth,
        gender: args.gender,
    };
    if request.is_empty() {
        bail!("Nothing to update. Pass at least one of --name, --phone, --date-of-birth, --gender");
    }

    let client = ctx.client()?;
    let user = client.users().update_me(&request).await?;

    if ctx.json() {
        return print_json(&user);
    }
    Status::success("Profile updated");
    print_user(&user);
    Ok(())
}

/// End the session; the local token is always cleared
pub async fn logout(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    client.users().logout().await?;

    if ctx.json() {
        return print_json(&json!({ "logged_out": true }));
    }
    Status::success("Logged out");
    Ok(())
}

/// Request a password-reset email
pub async fn forgot_password(ctx: &Context, email: &str) -> Result<()> {
    let client = ctx.client()?;
    let response = client.users().forgot_password(email).await?;

    if ctx.json() {
        return print_json(&response);
    }
    Status::success(
        response
            .message
            .as_deref()
            .unwrap_or("Password reset requested"),
    );
    Ok(())
}

/// Set a new password with an emailed token
pub async fn reset_password(ctx: &Context, args: ResetPasswordArgs) -> Result<()> {
    let client = ctx.client()?;
    let password_confirm = args.password_confirm.unwrap_or_else(|| args.password.clone());
    let request = ResetPasswordRequest {
        token: args.token,
        password: args.password,
        password_confirm,
    };

    let response = client.users().reset_password(&request).await?;

    if ctx.json() {
        return print_json(&json!({ "user": response.user() }));
    }
    Status::success("Password updated");
    Ok(())
}

fn print_user(user: &User) {
    Status::banner("PressureGuard Profile");
    Status::field("Name", &user.name);
    Status::field("Email", &user.email);
    if let Some(role) = user.role {
        Status::field("Role", &role.to_string());
    }
    if let Some(ref phone) = user.phone {
        Status::field("Phone", phone);
    }
    if let Some(birth) = user.birth_date() {
        Status::field("Born", &birth.to_string());
    }
    if let Some(ref gender) = user.gender {
        Status::field("Gender", gender);
    }
    println!();
}

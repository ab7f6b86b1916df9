//! PressureGuard CLI
//!
//! Drives the PressureGuard REST API through the authenticated client:
//! account flows, profile access, and raw requests that pick up the stored
//! session token.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod output;
mod settings;

use commands::account::{self, LoginArgs, ResetPasswordArgs, SignupArgs, UpdateMeArgs};
use commands::Context;
use settings::{Overrides, Settings};

/// Command-line client for the PressureGuard API
#[derive(Parser)]
#[command(name = "pressureguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Path to a pressureguard.toml
    #[arg(long, global = true)]
    config: Option<String>,

    /// API origin, e.g. https://api.example.com
    #[arg(long, global = true, env = "PRESSUREGUARD_API_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "PRESSUREGUARD_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Session file holding the auth token
    #[arg(long, global = true, env = "PRESSUREGUARD_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List API endpoints and whether they carry the session token
    Endpoints,

    /// Create an account
    Signup(SignupArgs),

    /// Log in and store the session token
    Login(LoginArgs),

    /// Show the signed-in profile
    Me,

    /// Update profile fields
    UpdateMe(UpdateMeArgs),

    /// Log out and clear the stored session
    Logout,

    /// Request a password-reset email
    ForgotPassword {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Set a new password using an emailed reset token
    ResetPassword(ResetPasswordArgs),

    /// Send a raw request through the authenticated pipeline
    Request {
        /// HTTP method
        method: String,

        /// Path relative to the base URL, or an absolute URL
        path: String,

        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,

        /// Extra header as "Name: value" (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = cli.format.clone();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::report_error(&e, &format);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(Overrides {
        config: cli.config,
        base_url: cli.base_url,
        timeout_secs: cli.timeout,
        session_file: cli.session_file,
        verbose: cli.verbose,
    })?;

    pressureguard_telemetry::init_with_config(&settings.telemetry())?;

    let ctx = Context::new(settings, cli.format);

    match cli.command {
        Commands::Endpoints => commands::endpoints::run(&ctx),
        Commands::Signup(args) => account::signup(&ctx, args).await,
        Commands::Login(args) => account::login(&ctx, args).await,
        Commands::Me => account::me(&ctx).await,
        Commands::UpdateMe(args) => account::update_me(&ctx, args).await,
        Commands::Logout => account::logout(&ctx).await,
        Commands::ForgotPassword { email } => account::forgot_password(&ctx, &email).await,
        Commands::ResetPassword(args) => account::reset_password(&ctx, args).await,
        Commands::Request {
            method,
            path,
            data,
            headers,
        } => commands::request::run(&ctx, &method, &path, data.as_deref(), &headers).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_request_with_headers() {
        let cli = Cli::try_parse_from([
            "pressureguard",
            "--base-url",
            "http://localhost:3000",
            "request",
            "POST",
            "/api/readings",
            "--data",
            "{\"systolic\":120}",
            "-H",
            "X-Trace: 1",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:3000"));
        match cli.command {
            Commands::Request { method, path, data, headers } => {
                assert_eq!(method, "POST");
                assert_eq!(path, "/api/readings");
                assert_eq!(data.as_deref(), Some("{\"systolic\":120}"));
                assert_eq!(headers, vec!["X-Trace: 1".to_string()]);
            }
            _ => panic!("expected request command"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["pressureguard", "--format", "xml", "endpoints"]).is_err());
    }
}

//! Endpoints command - show the resolved endpoint registry

use super::Context;
use crate::output::{print_json, Status};
use anyhow::Result;
use owo_colors::OwoColorize;
use pressureguard_api_client::EndpointRegistry;
use serde::Serialize;

/// JSON output for the registry
#[derive(Debug, Serialize)]
struct JsonEndpointsOutput {
    base_url: String,
    endpoints: Vec<EndpointDetail>,
}

#[derive(Debug, Serialize)]
struct EndpointDetail {
    name: &'static str,
    path: &'static str,
    url: String,
    public: bool,
}

/// Run endpoints command
pub fn run(ctx: &Context) -> Result<()> {
    let config = ctx.settings.client_config()?;
    let registry = EndpointRegistry::new(config.base_url);

    if ctx.json() {
        let output = JsonEndpointsOutput {
            base_url: registry.base_url().to_string(),
            endpoints: registry
                .iter()
                .map(|(endpoint, url)| EndpointDetail {
                    name: endpoint.name(),
                    path: endpoint.path(),
                    url,
                    public: endpoint.is_public(),
                })
                .collect(),
        };
        return print_json(&output);
    }

    Status::banner("PressureGuard API Endpoints");
    Status::field("Base URL", registry.base_url());
    println!();

    println!(
        "  {:<16} {:<8} {}",
        "Name".dimmed(),
        "Auth".dimmed(),
        "URL".dimmed()
    );
    for (endpoint, url) in registry.iter() {
        let auth = if endpoint.is_public() {
            "public".green().to_string()
        } else {
            "bearer".yellow().to_string()
        };
        println!("  {:<16} {:<8} {}", endpoint.name(), auth, url);
    }
    println!();

    Ok(())
}

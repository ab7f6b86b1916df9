//! Request command - send an arbitrary call through the authenticated pipeline

use super::Context;
use crate::output::{print_json, Status};
use anyhow::{bail, Context as _, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;

/// Run request command
pub async fn run(
    ctx: &Context,
    method: &str,
    path: &str,
    data: Option<&str>,
    headers: &[String],
) -> Result<()> {
    let method = parse_method(method)?;
    let body = data
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("--data must be valid JSON")?;
    let headers = parse_headers(headers)?;

    let client = ctx.client()?;
    let response = client.send(path, method, body, headers).await?;

    match response {
        Value::Null if !ctx.json() => Status::info("Empty response"),
        Value::String(ref text) if !ctx.json() => println!("{text}"),
        other => print_json(&other)?,
    }
    Ok(())
}

fn parse_method(raw: &str) -> Result<Method> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method {raw:?}"))
}

/// Parse `Name: value` pairs
fn parse_headers(raw: &[String]) -> Result<Option<HeaderMap>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let mut headers = HeaderMap::new();
    for entry in raw {
        let Some((name, value)) = entry.split_once(':') else {
            bail!("Header {entry:?} must look like \"Name: value\"");
        };
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .with_context(|| format!("Invalid header name in {entry:?}"))?;
        let value = HeaderValue::from_str(value.trim())
            .with_context(|| format!("Invalid header value in {entry:?}"))?;
        headers.append(name, value);
    }
    Ok(Some(headers))
}

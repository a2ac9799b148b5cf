//! Exchange command - Run hooks around a canned request and response.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use reapi_ext::Extension;
use reapi_ext_core::{ApiRequest, ApiResponse, Exchange};
use reapi_ext_host::{ExchangeOutcome, HostError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::print_json;
use crate::OutputFormat;

/// Arguments for the exchange command.
#[derive(Args)]
pub struct ExchangeArgs {
    /// Before-request hook ids, in order
    #[arg(short, long = "before")]
    pub before: Vec<String>,

    /// After-request hook ids, in order
    #[arg(short, long = "after")]
    pub after: Vec<String>,

    /// Request to send (JSON file with method, url, query, headers, body)
    #[arg(long)]
    pub request: Option<PathBuf>,

    /// Response the transport returns (JSON file with status, headers, data)
    #[arg(long)]
    pub response: Option<PathBuf>,

    /// Request URL, when no request file is given
    #[arg(long, default_value = "https://example.com/")]
    pub url: String,
}

/// Execute the exchange command.
pub fn execute(
    extension: &Extension,
    args: ExchangeArgs,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let request = match &args.request {
        Some(path) => read_json::<ApiRequest>(path)?,
        None => ApiRequest::get(args.url.as_str()),
    };
    let response = match &args.response {
        Some(path) => read_json::<ApiResponse>(path)?,
        None => ApiResponse::ok().with_data(Map::new()),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let harness = extension.harness();
    let outcome = runtime
        .block_on(harness.run_exchange(
            Exchange::new(request),
            args.before.as_slice(),
            move |_request: ApiRequest| async move { Ok::<_, HostError>(response) },
            args.after.as_slice(),
        ))
        .context("Exchange failed")?;

    if print_json(&outcome, format)? {
        return Ok(());
    }
    print_human(&outcome, quiet);
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_human(outcome: &ExchangeOutcome, quiet: bool) {
    let exchange = &outcome.exchange;

    if !quiet {
        println!("Exchange: {}", exchange.id);
        println!();
    }

    println!("Request: {} {}", exchange.request.method, exchange.request.url);
    print_map("Headers", &exchange.request.headers);
    print_map("Query", &exchange.request.query);

    if let Some(response) = &exchange.response {
        println!();
        println!("Response: {} {}", response.status, response.status_text);
        if let Some(data) = &response.data {
            print_map("Data", data);
        }
    }

    println!();
    print_map("Context", exchange.context.as_map());

    if !outcome.tolerated.is_empty() {
        println!();
        println!("Tolerated hook failures ({}):", outcome.tolerated.len());
        for failure in &outcome.tolerated {
            println!("  {} [{}]: {}", failure.id, failure.stage, failure.message);
        }
    }
}

fn print_map(label: &str, map: &Map<String, Value>) {
    if map.is_empty() {
        println!("  {}: (none)", label);
        return;
    }
    println!("  {}:", label);
    for (key, value) in map {
        println!("    {}: {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_json_request() {
        let dir = std::env::temp_dir().join(format!("reapi-ext-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("request.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"method": "POST", "url": "https://api.example.com", "headers": {{"X-Test": "1"}}}}"#
        )
        .unwrap();

        let request: ApiRequest = read_json(&path).unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.headers["X-Test"], "1");
        assert!(request.query.is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_json_missing_file() {
        assert!(read_json::<ApiResponse>(Path::new("/no/such/response.json")).is_err());
    }
}

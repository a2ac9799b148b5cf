//! Subcommand implementations.

pub mod describe;
pub mod exchange;
pub mod invoke;
pub mod list;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::OutputFormat;

/// Print a serializable result in one of the JSON formats.
///
/// Returns `false` for [`OutputFormat::Human`], leaving the caller to render.
pub(crate) fn print_json<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Human => Ok(false),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(true)
        }
        OutputFormat::JsonCompact => {
            println!("{}", serde_json::to_string(value)?);
            Ok(true)
        }
    }
}

/// Parse a command-line argument as a JSON value.
pub(crate) fn parse_json_arg(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| {
        format!(
            "Argument is not valid JSON: {} (quote strings, e.g. '\"text\"')",
            raw
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_arg() {
        assert_eq!(parse_json_arg("42").unwrap(), json!(42));
        assert_eq!(parse_json_arg("\"42\"").unwrap(), json!("42"));
        assert_eq!(parse_json_arg("{\"lat\": 1, \"lng\": 2}").unwrap(), json!({"lat": 1, "lng": 2}));
        assert!(parse_json_arg("hello").is_err());
    }

    #[test]
    fn test_print_json_human_defers() {
        assert!(!print_json(&json!(1), OutputFormat::Human).unwrap());
    }
}

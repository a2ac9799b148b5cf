//! Assert and value commands - Invoke a function by id.

use anyhow::{Context, Result, bail};
use clap::Args;
use reapi_ext::Extension;
use serde::Serialize;
use serde_json::Value;

use super::{parse_json_arg, print_json};
use crate::OutputFormat;

/// Arguments for the assert command.
#[derive(Args)]
pub struct AssertArgs {
    /// Assertion id
    #[arg(required = true)]
    pub id: String,

    /// Actual value (JSON)
    #[arg(required = true)]
    pub actual: String,

    /// Expected value (JSON), for two-parameter assertions
    pub expected: Option<String>,
}

/// Arguments for the value command.
#[derive(Args)]
pub struct ValueArgs {
    /// Generator or transformer id
    #[arg(required = true)]
    pub id: String,

    /// Input value (JSON), for transformers
    pub input: Option<String>,
}

#[derive(Debug, Serialize)]
struct ValueOutput<'a> {
    id: &'a str,
    value: Value,
}

/// Execute the assert command.
///
/// A failing assertion is reported and turned into a non-zero exit.
pub fn assert(extension: &Extension, args: AssertArgs, format: OutputFormat) -> Result<()> {
    let mut inputs = vec![parse_json_arg(&args.actual)?];
    if let Some(expected) = &args.expected {
        inputs.push(parse_json_arg(expected)?);
    }

    let result = extension
        .harness()
        .assert(&args.id, &inputs)
        .with_context(|| format!("Failed to evaluate {}", args.id))?;

    if !print_json(&result, format)? {
        let verdict = if result.passed { "PASS" } else { "FAIL" };
        match &result.message {
            Some(message) => println!("{}: {}", verdict, message),
            None => println!("{}", verdict),
        }
    }

    if !result.passed {
        bail!("Assertion {} did not pass", args.id);
    }
    Ok(())
}

/// Execute the value command.
pub fn value(extension: &Extension, args: ValueArgs, format: OutputFormat) -> Result<()> {
    let inputs = match &args.input {
        Some(raw) => vec![parse_json_arg(raw)?],
        None => Vec::new(),
    };

    let value = extension
        .harness()
        .value(&args.id, &inputs)
        .with_context(|| format!("Failed to run {}", args.id))?;

    let output = ValueOutput {
        id: &args.id,
        value,
    };
    if !print_json(&output, format)? {
        match &output.value {
            Value::String(s) => println!("{}", s),
            other => println!("{}", other),
        }
    }

    Ok(())
}

//! Describe command - Show one function's descriptor.

use anyhow::{Result, bail};
use clap::Args;
use reapi_ext::Extension;

use super::print_json;
use crate::OutputFormat;

/// Arguments for the describe command.
#[derive(Args)]
pub struct DescribeArgs {
    /// Function id
    #[arg(required = true)]
    pub id: String,
}

/// Execute the describe command.
pub fn execute(extension: &Extension, args: DescribeArgs, format: OutputFormat) -> Result<()> {
    let Some(summary) = extension.library().describe(&args.id) else {
        bail!("Unknown function: {}", args.id);
    };

    if print_json(&summary, format)? {
        return Ok(());
    }

    let meta = &summary.meta;
    println!("Id:           {}", meta.id);
    println!("Kind:         {}", summary.kind);
    if let Some(name) = &meta.display_name {
        println!("Name:         {}", name);
    }
    if let Some(description) = &meta.description {
        println!("Description:  {}", description);
    }
    if let Some(n) = summary.no_of_params {
        println!("Parameters:   {}", n);
    }
    if let Some(stage) = summary.hook_type {
        println!("Stage:        {}", stage);
    }
    println!("Enabled:      {}", meta.enabled);
    println!("Tested:       {}", meta.tested);
    println!("Deprecated:   {}", meta.deprecated);

    Ok(())
}

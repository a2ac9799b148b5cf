//! List command - Enumerate the registries.

use anyhow::Result;
use clap::{Args, ValueEnum};
use reapi_ext::Extension;
use reapi_ext_core::{DescriptorKind, DescriptorSummary};

use super::print_json;
use crate::OutputFormat;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Only list one registry
    #[arg(short, long, value_enum)]
    pub kind: Option<KindFilter>,

    /// Include disabled and hidden functions
    #[arg(short, long)]
    pub all: bool,
}

/// Registry selector.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindFilter {
    /// Assertion functions
    Assertion,
    /// Value generators
    Generator,
    /// Transformers
    Transformer,
    /// API hooks
    Hook,
}

impl From<KindFilter> for DescriptorKind {
    fn from(filter: KindFilter) -> Self {
        match filter {
            KindFilter::Assertion => DescriptorKind::Assertion,
            KindFilter::Generator => DescriptorKind::Generator,
            KindFilter::Transformer => DescriptorKind::Transformer,
            KindFilter::Hook => DescriptorKind::Hook,
        }
    }
}

/// Execute the list command.
pub fn execute(extension: &Extension, args: ListArgs, format: OutputFormat) -> Result<()> {
    let summaries = if args.all {
        extension.summaries()
    } else {
        extension.harness().visible_summaries()
    };

    let summaries: Vec<DescriptorSummary> = match args.kind {
        Some(kind) => {
            let kind = DescriptorKind::from(kind);
            summaries.into_iter().filter(|s| s.kind == kind).collect()
        }
        None => summaries,
    };

    if print_json(&summaries, format)? {
        return Ok(());
    }

    let mut current = None;
    for summary in &summaries {
        if current != Some(summary.kind) {
            if current.is_some() {
                println!();
            }
            println!("{}:", heading(summary.kind));
            current = Some(summary.kind);
        }
        println!(
            "  {:<34} {:<26} {}",
            summary.meta.id,
            summary.meta.display_name.as_deref().unwrap_or("-"),
            shape(summary)
        );
    }

    if summaries.is_empty() {
        println!("No functions registered.");
    }

    Ok(())
}

fn heading(kind: DescriptorKind) -> &'static str {
    match kind {
        DescriptorKind::Assertion => "Assertions",
        DescriptorKind::Generator => "Generators",
        DescriptorKind::Transformer => "Transformers",
        DescriptorKind::Hook => "Hooks",
    }
}

fn shape(summary: &DescriptorSummary) -> String {
    match (summary.no_of_params, summary.hook_type) {
        (_, Some(stage)) => format!("[{}]", stage),
        (Some(n), None) => format!("[{} param{}]", n, if n == 1 { "" } else { "s" }),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reapi_ext::ReapiExt;

    #[test]
    fn test_shape() {
        let extension = ReapiExt::with_defaults().unwrap();
        let summaries = extension.summaries();

        let shapes: Vec<String> = summaries.iter().map(shape).collect();
        assert_eq!(shapes[0], "[1 param]");
        assert!(shapes.contains(&"[0 params]".to_string()));
        assert!(shapes.contains(&"[beforeRequest]".to_string()));
    }
}

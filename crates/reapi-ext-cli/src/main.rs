//! reapi-ext CLI - Inspect and invoke reapi extension functions.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use reapi_ext::{Extension, ReapiExt};
use reapi_ext_host::HostConfig;
use tracing_subscriber::EnvFilter;

mod commands;

/// reapi Extension Functions
#[derive(Parser)]
#[command(name = "reapi-ext")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Host configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Output format options.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List registered functions
    List(commands::list::ListArgs),
    /// Show one function's descriptor
    Describe(commands::describe::DescribeArgs),
    /// Evaluate an assertion
    Assert(commands::invoke::AssertArgs),
    /// Run a generator or transformer
    Value(commands::invoke::ValueArgs),
    /// Run hooks around a canned request/response
    Exchange(commands::exchange::ExchangeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reapi_ext={}", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = load_extension(cli.config.as_deref()).and_then(|extension| match cli.command {
        Commands::List(args) => commands::list::execute(&extension, args, cli.format),
        Commands::Describe(args) => commands::describe::execute(&extension, args, cli.format),
        Commands::Assert(args) => commands::invoke::assert(&extension, args, cli.format),
        Commands::Value(args) => commands::invoke::value(&extension, args, cli.format),
        Commands::Exchange(args) => {
            commands::exchange::execute(&extension, args, cli.format, cli.quiet)
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn load_extension(config: Option<&Path>) -> Result<Extension> {
    let config = match config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading host config");
            HostConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => HostConfig::default(),
    };

    ReapiExt::builder()
        .with_config(config)
        .build()
        .context("Failed to build function library")
}

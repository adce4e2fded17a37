//! layer-lint CLI tool.
//!
//! Usage:
//! ```bash
//! layer-lint [OPTIONS] <ROOT>
//! layer-lint layers [ROOT]
//! layer-lint init
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use layer_lint_core::ConfigError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Checks that inner architecture layers never import outer ones
#[derive(Parser)]
#[command(name = "layer-lint")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the layer configuration file.
    ///
    /// Optional: when omitted, layers.json, .layers.json, layers.toml or
    /// .layers.toml in the scanned root is used, then layers.json in
    /// $LAYER_LINT_CONFIG_DIR (default ~/.layer-lint). It is an error only
    /// when none of these exist.
    #[arg(short, long, global = true, env = "LAYER_LINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    check: CheckArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Arguments of the default scan.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Root directory to scan
    #[arg(required = true)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Do not honor .gitignore and .ignore files
    #[arg(long)]
    pub no_ignore: bool,

    /// Number of worker threads (1 = sequential)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Exit with status 1 when any violation is found
    #[arg(long)]
    pub fail_on_violations: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured layers, innermost first
    Layers {
        /// Directory to look for a project config in (default: current directory)
        #[arg(default_value = ".")]
        root: PathBuf,
    },

    /// Create a starter layer configuration in the current directory
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,

        /// Configuration file format
        #[arg(short, long, value_enum, default_value = "json")]
        format: commands::init::InitFormat,
    },
}

/// Output format for scan results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per violation.
    #[default]
    Text,
    /// JSON report.
    Json,
    /// `file:line:col` lines with layer ranks.
    Compact,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            report_error(err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Some(Commands::Layers { root }) => {
            commands::layers::run(&root, cli.config.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Init { force, format }) => {
            commands::init::run(force, format)?;
            Ok(ExitCode::SUCCESS)
        }
        None => commands::check::run(&cli.check, cli.config.as_deref()),
    }
}

/// Configuration errors are rendered as diagnostics with their source span.
fn report_error(err: anyhow::Error) {
    match err.downcast::<ConfigError>() {
        Ok(config_err) => eprintln!("{:?}", miette::Report::new(config_err)),
        Err(err) => eprintln!("error: {err:#}"),
    }
}

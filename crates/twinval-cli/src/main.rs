//! # twinval CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use twinval_cli::validate::{run_check_schema, run_validate, CheckSchemaArgs, ValidateArgs};
use twinval_cli::EXIT_OPERATIONAL;

/// Validate a data document against a schema document.
///
/// Reports structural errors, errors, warnings and info notices found by
/// cross-checking class and attribute names, column types, foreign keys and
/// column properties.
#[derive(Parser, Debug)]
#[command(name = "twinval", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a data document against a schema document.
    Validate(ValidateArgs),

    /// Check only the structure of a schema document.
    CheckSchema(CheckSchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level. Logs go to stderr so the
    // report on stdout stays machine-readable.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "twinval starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, cli.config.as_deref()),
        Commands::CheckSchema(args) => run_check_schema(&args, cli.config.as_deref()),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}

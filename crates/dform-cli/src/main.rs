//! # dform CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dform_cli::check::{run_check, CheckArgs};
use dform_cli::export::{run_json_schema, JsonSchemaArgs};
use dform_cli::fetch::{run_fetch, FetchArgs};
use dform_cli::validate::{run_validate, ValidateArgs};

/// Dynamic form descriptor toolkit.
///
/// Inspects descriptor files, validates values against the schema derived
/// from them, and talks to a running descriptor service.
#[derive(Parser, Debug)]
#[command(name = "dform", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a descriptor file and report any repairs.
    Check(CheckArgs),

    /// Validate a values file against a descriptor file.
    Validate(ValidateArgs),

    /// Fetch the descriptor list from a running service.
    Fetch(FetchArgs),

    /// Print the JSON Schema derived from a descriptor file.
    #[command(name = "json-schema")]
    JsonSchema(JsonSchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so JSON output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Validate(args) => run_validate(&args),
        Commands::Fetch(args) => run_fetch(&args),
        Commands::JsonSchema(args) => run_json_schema(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

//! # mizan CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mizan_cli::assess::{run_assess, AssessArgs};
use mizan_cli::brief::{run_brief, BriefArgs};
use mizan_cli::frameworks::{run_frameworks, FrameworksArgs};
use mizan_cli::validate::{run_validate, ValidateArgs};
use mizan_cli::LoadOptions;

/// Mizan compliance assessment engine.
///
/// Maps an organization's evidence onto a unified control taxonomy across
/// the selected regulatory frameworks and reports gaps, ranked risks,
/// benchmark positions and remediation estimates.
#[derive(Parser, Debug)]
#[command(name = "mizan", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Catalogue directory (taxonomy, frameworks, benchmarks, knowledge).
    /// Uses the built-in catalogue when omitted.
    #[arg(long, global = true)]
    catalogue: Option<PathBuf>,

    /// Engine configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an assessment and print the report.
    Assess(AssessArgs),

    /// List frameworks in the registry.
    Frameworks(FrameworksArgs),

    /// Load and validate the catalogue and engine configuration.
    Validate(ValidateArgs),

    /// Print the narrative brief handed to the text generator.
    Brief(BriefArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "mizan CLI starting");

    let opts = LoadOptions {
        catalogue: cli.catalogue,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Assess(args) => run_assess(&args, &opts),
        Commands::Frameworks(args) => run_frameworks(&args, &opts),
        Commands::Validate(args) => run_validate(&args, &opts),
        Commands::Brief(args) => run_brief(&args, &opts),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

//! # reefstow CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reefstow_cli::rotation::{run_rotation, RotationArgs};
use reefstow_cli::serve::{run_serve, ServeArgs};
use reefstow_cli::validate::{run_validate, ValidateArgs};

/// Reefer stowage planning toolchain.
///
/// Validates stowage plan bundles against the compartment model, the
/// voyage rotation, and the cooling-section temperature rules, and runs
/// the planning API.
#[derive(Parser, Debug)]
#[command(name = "reefstow", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a plan bundle and print conflicts, violations, and the
    /// preliminary stability estimate.
    Validate(ValidateArgs),

    /// Print a voyage's effective rotation.
    Rotation(RotationArgs),

    /// Run the planning API server.
    Serve(ServeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Rotation(args) => run_rotation(&args),
        Commands::Serve(args) => run_serve(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

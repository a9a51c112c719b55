//! # Rotation Subcommand
//!
//! Prints the effective rotation of a voyage file: active calls only,
//! ordered by ETA, renumbered from 1. Useful for checking what the
//! overstow detector will see after schedule changes or cancellations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use reefstow_model::Voyage;

/// Arguments for the `reefstow rotation` subcommand.
#[derive(Args, Debug)]
pub struct RotationArgs {
    /// Voyage JSON file.
    #[arg(long)]
    pub voyage: PathBuf,
}

/// Execute the rotation subcommand.
pub fn run_rotation(args: &RotationArgs) -> Result<u8> {
    let raw = std::fs::read_to_string(&args.voyage)
        .with_context(|| format!("failed to read {}", args.voyage.display()))?;
    let voyage: Voyage = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", args.voyage.display()))?;
    voyage.validate()?;

    let cancelled = voyage.port_calls.iter().filter(|c| c.cancelled).count();
    println!(
        "Voyage {} ({}): {} calls, {} cancelled",
        voyage.id,
        voyage.service_code,
        voyage.port_calls.len(),
        cancelled
    );

    for entry in voyage.effective_rotation().entries() {
        let ops = match (entry.load, entry.discharge) {
            (true, true) => "load+discharge",
            (true, false) => "load",
            (false, true) => "discharge",
            (false, false) => "call only",
        };
        println!(
            "  {:>2}. {}  ETA {}  {}",
            entry.sequence,
            entry.port,
            entry.eta.to_iso8601(),
            ops
        );
    }

    Ok(0)
}

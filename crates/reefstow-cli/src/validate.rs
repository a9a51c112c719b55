//! # Validate Subcommand
//!
//! Offline validation of a plan bundle: loads vessel, voyage, bookings,
//! and plan from JSON, runs the full validation pass, and prints every
//! conflict and violation along with the stability estimate.
//!
//! Exit code 0 when the plan is clean, 1 when any blocking finding is
//! present. Capacity overages are advisory and never affect the exit
//! code, matching the planning rule that planners may intentionally
//! overfill a compartment on paper.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use reefstow_plan::recompute::recompute;
use reefstow_plan::ValidationReport;

use crate::bundle::load_bundle;

/// Arguments for the `reefstow validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Bundle to validate: a directory of JSON files or one JSON file.
    #[arg(long)]
    pub bundle: PathBuf,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let bundle = load_bundle(&args.bundle)?;
    let snapshot = bundle
        .plan
        .snapshot()
        .context("plan positions contain a duplicate cell")?;

    tracing::debug!(
        vessel = %bundle.vessel.name,
        voyage = %bundle.voyage.id,
        positions = snapshot.len(),
        "running validation pass"
    );

    let report = recompute(
        &bundle.vessel,
        &bundle.voyage,
        &bundle.bookings,
        &snapshot,
        &bundle.plan.section_temperatures,
    );

    println!(
        "Plan for {} / voyage {} ({} pallets placed)",
        bundle.vessel.name,
        bundle.voyage.service_code,
        snapshot.len()
    );
    print_report(&report);

    if report.is_clean() {
        println!("\nResult: CLEAN");
        Ok(0)
    } else {
        println!("\nResult: BLOCKED");
        Ok(1)
    }
}

fn print_report(report: &ValidationReport) {
    println!("\nReferential conflicts: {}", report.referential_conflicts.len());
    for c in &report.referential_conflicts {
        println!("  - {} ({})", c.description, c.booking_id);
    }

    println!("Temperature conflicts: {}", report.temperature_conflicts.len());
    for c in &report.temperature_conflicts {
        println!("  - {}", c.description);
    }

    println!("Overstow violations: {}", report.overstow_violations.len());
    for v in &report.overstow_violations {
        println!("  - {}", v.description);
    }

    println!("Allocation excesses: {}", report.allocation_excesses.len());
    for e in &report.allocation_excesses {
        println!(
            "  - booking {}: {} placed, {} confirmed",
            e.booking_id, e.placed, e.confirmed
        );
    }

    println!(
        "Capacity overages (advisory): {}",
        report.capacity_overages.len()
    );
    for o in &report.capacity_overages {
        println!(
            "  - {}: {} placed in a {}-pallet compartment",
            o.compartment_id, o.placed, o.capacity
        );
    }

    let s = &report.stability;
    println!("\nPreliminary stability:");
    println!(
        "  displacement {:.1} t, GM {:.2} m, trim {:.2} m, list {:.2} deg",
        s.displacement_t, s.gm_m, s.trim_m, s.list_deg
    );
    println!(
        "  drafts fwd {:.2} m / mean {:.2} m / aft {:.2} m",
        s.draft_fwd_m, s.draft_mean_m, s.draft_aft_m
    );
    if s.within_limits {
        println!("  within reference limits");
    } else {
        for w in &s.warnings {
            println!("  WARNING: {w}");
        }
    }
    println!("  {}", s.disclaimer);
}

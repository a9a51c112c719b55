//! # Serve Subcommand
//!
//! Runs the planning API on a local port. Stores start empty unless a
//! bundle is given, in which case its vessel, voyage, and bookings are
//! seeded so plans can be created against them immediately.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use reefstow_api::AppState;

use crate::bundle::load_bundle;

/// Arguments for the `reefstow serve` subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Optional bundle whose vessel, voyage, and bookings seed the
    /// in-memory stores. The bundle's plan section is ignored; plans
    /// are created through the API.
    #[arg(long)]
    pub bundle: Option<PathBuf>,
}

/// Execute the serve subcommand. Blocks until the server stops.
pub fn run_serve(args: &ServeArgs) -> Result<u8> {
    let state = AppState::new();

    if let Some(path) = &args.bundle {
        let bundle = load_bundle(path)?;
        tracing::info!(
            vessel = %bundle.vessel.name,
            voyage = %bundle.voyage.id,
            bookings = bundle.bookings.len(),
            "seeding stores from bundle"
        );
        state.vessels.write().insert(bundle.vessel);
        state.voyages.write().insert(bundle.voyage);
        let mut bookings = state.bookings.write();
        for booking in bundle.bookings {
            bookings.insert(booking);
        }
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(serve(state, args.port))?;
    Ok(0)
}

async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = reefstow_api::app(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("reefstow API listening on {addr}");

    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}

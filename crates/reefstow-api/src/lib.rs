//! # reefstow-api — Axum API Service
//!
//! The HTTP surface of the stowage planner, built on Axum/Tower/Tokio.
//!
//! ## API Surface
//!
//! | Prefix                | Module             | Domain                     |
//! |-----------------------|--------------------|----------------------------|
//! | `/v1/plans/*`         | [`routes::plans`]  | Plan lifecycle and editing |
//! | `/openapi.json`       | [`openapi`]        | Generated OpenAPI spec     |
//! | `/health/*`           | crate root         | Kubernetes health probes   |
//!
//! ## Architecture
//!
//! Request/response types are compile-time contracts via serde derive;
//! the OpenAPI spec is generated from handler annotations via utoipa.
//! No planning logic lives in route handlers — they parse, delegate to
//! `reefstow-plan`, and map errors to structured HTTP responses via
//! [`AppError`]. Every plan mutation holds that plan's write mutex for
//! the full edit-recompute-writeback cycle.

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router.
///
/// Health probes mount outside the API router so they stay reachable
/// regardless of API middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::plans::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(probes).merge(api)
}

/// Liveness probe: the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the in-memory stores are accessible and no plan
/// store lock is wedged.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.plans.try_read().is_none() {
        return (StatusCode::SERVICE_UNAVAILABLE, "plan store locked").into_response();
    }
    let _ = state.vessels.read();
    let _ = state.voyages.read();
    let _ = state.bookings.read();
    (StatusCode::OK, "ready").into_response()
}

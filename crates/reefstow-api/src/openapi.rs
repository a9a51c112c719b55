//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single spec served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the whole API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reefstow API",
        description = "Stowage planning service for specialized reefer vessels: \
pallet-granular cargo placement, cooling-section temperature allocation, \
overstow detection, preliminary stability estimation, and the stowage-plan \
review lifecycle.",
        license(name = "AGPL-3.0-or-later"),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::plans::create_plan,
        crate::routes::plans::get_plan,
        crate::routes::plans::paint,
        crate::routes::plans::move_pallet,
        crate::routes::plans::set_temperature,
        crate::routes::plans::transition_plan,
        crate::routes::plans::revise_plan,
    ),
    components(schemas(
        crate::routes::plans::CreatePlanRequest,
        crate::routes::plans::CellRefInput,
        crate::routes::plans::PaintRequest,
        crate::routes::plans::MoveRequest,
        crate::routes::plans::SetTemperatureRequest,
        crate::routes::plans::TransitionPlanRequest,
        crate::routes::plans::PlanView,
        crate::routes::plans::PositionView,
        crate::routes::plans::SectionTemperatureView,
        crate::routes::plans::TransitionView,
        crate::routes::plans::CaptainResponseView,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "plans", description = "Stowage plan lifecycle and editing"),
    )
)]
pub struct ApiDoc;

/// Router serving the generated spec.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

//! # Stowage Plan Routes
//!
//! Plan creation, placement edits, cooling-section set-points, lifecycle
//! transitions, and the revision chain. Every mutation runs a full
//! validation recompute before the response, so clients always see the
//! plan's current conflict and stability state.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use reefstow_core::{
    BookingId, Celsius, CompartmentId, CoolingSectionId, PlanId, Timestamp, VoyageId,
};
use reefstow_model::{VesselRepository, VoyageRepository};
use reefstow_plan::recompute::refresh_plan;
use reefstow_plan::{
    CaptainResponse, CellRef, PlanError, PlanSnapshot, PlanStatus, SectionTemperature, StowagePlan,
};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to create a plan for a voyage.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePlanRequest {
    /// The voyage to plan.
    pub voyage_id: Uuid,
}

impl Validate for CreatePlanRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// One cell reference on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CellRefInput {
    /// Compartment code, e.g. `1A`.
    pub compartment_id: String,
    /// Slot within the compartment.
    pub slot_index: u32,
}

impl CellRefInput {
    fn parse(&self) -> Result<CellRef, AppError> {
        let compartment_id = CompartmentId::new(&self.compartment_id)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(CellRef {
            compartment_id,
            slot_index: self.slot_index,
        })
    }
}

/// Request to paint one pallet of a booking onto a cell.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaintRequest {
    /// Target cell.
    pub cell: CellRefInput,
    /// The booking being painted.
    pub booking_id: Uuid,
}

impl Validate for PaintRequest {
    fn validate(&self) -> Result<(), String> {
        if self.cell.compartment_id.trim().is_empty() {
            return Err("compartment_id must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request to move or swap a placed pallet.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveRequest {
    /// The cell the pallet was grabbed from.
    pub source: CellRefInput,
    /// The cell it was dropped on.
    pub dest: CellRefInput,
}

impl Validate for MoveRequest {
    fn validate(&self) -> Result<(), String> {
        if self.source.compartment_id.trim().is_empty()
            || self.dest.compartment_id.trim().is_empty()
        {
            return Err("source and dest compartment_id must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request to assign a cooling-section set-point.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetTemperatureRequest {
    /// Set-point in degrees Celsius.
    pub set_point_celsius: f64,
}

impl Validate for SetTemperatureRequest {
    fn validate(&self) -> Result<(), String> {
        // Machinery range of a reefer vessel; anything outside is a typo.
        if !(-35.0..=30.0).contains(&self.set_point_celsius) {
            return Err("set_point_celsius must be between -35 and 30".to_string());
        }
        Ok(())
    }
}

/// Request to transition a plan's lifecycle state.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransitionPlanRequest {
    /// Target state name, e.g. `READY_FOR_CAPTAIN`.
    pub target_state: String,
    /// Who triggered the transition. For captain decisions this is the
    /// responding master's name.
    pub actor: String,
    /// Free-text context; for captain decisions, the captain's comments.
    pub reason: Option<String>,
}

impl Validate for TransitionPlanRequest {
    fn validate(&self) -> Result<(), String> {
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        self.target_state
            .parse::<PlanStatus>()
            .map(|_| ())
            .map_err(|e| format!("{e}. Valid states: {}",
                PlanStatus::all()
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>()
                    .join(", ")))
    }
}

/// A placed pallet on the wire.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PositionView {
    pub booking_id: Uuid,
    pub compartment_id: String,
    pub slot_index: u32,
}

/// A section set-point on the wire.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SectionTemperatureView {
    pub section_id: String,
    pub set_point_celsius: f64,
}

/// One transition log entry on the wire.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransitionView {
    pub from_state: String,
    pub to_state: String,
    pub timestamp: String,
    pub actor: String,
    pub reason: Option<String>,
}

/// The captain's response on the wire.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CaptainResponseView {
    pub responder: String,
    pub comments: String,
    pub at: String,
}

/// Full plan view returned by every plan endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlanView {
    pub id: Uuid,
    pub voyage_id: Uuid,
    pub previous_plan_id: Option<Uuid>,
    pub revision: u32,
    /// Lifecycle state name, e.g. `DRAFT`.
    pub status: String,
    pub positions: Vec<PositionView>,
    pub section_temperatures: Vec<SectionTemperatureView>,
    /// The full validation report including the stability estimate and
    /// its disclaimer; absent until the first recompute.
    #[schema(value_type = Object)]
    pub report: Option<serde_json::Value>,
    /// Whether the report predates the latest edit.
    pub stale: bool,
    pub captain_response: Option<CaptainResponseView>,
    pub email_sent_at: Option<String>,
    pub transition_log: Vec<TransitionView>,
    pub created_at: String,
}

impl PlanView {
    fn from_snapshot(snapshot: PlanSnapshot) -> Result<Self, AppError> {
        let report = snapshot
            .report
            .map(|r| serde_json::to_value(&r))
            .transpose()
            .map_err(|e| AppError::Internal(format!("report serialization failed: {e}")))?;
        Ok(Self {
            id: *snapshot.id.as_uuid(),
            voyage_id: *snapshot.voyage_id.as_uuid(),
            previous_plan_id: snapshot.previous_plan_id.map(|p| *p.as_uuid()),
            revision: snapshot.revision,
            status: snapshot.status.name().to_string(),
            positions: snapshot
                .positions
                .into_iter()
                .map(|p| PositionView {
                    booking_id: *p.booking_id.as_uuid(),
                    compartment_id: p.compartment_id.to_string(),
                    slot_index: p.slot_index,
                })
                .collect(),
            section_temperatures: snapshot
                .section_temperatures
                .into_iter()
                .map(|a| SectionTemperatureView {
                    section_id: a.section_id.to_string(),
                    set_point_celsius: a.set_point.0,
                })
                .collect(),
            report,
            stale: snapshot.stale,
            captain_response: snapshot.captain_response.map(|r| CaptainResponseView {
                responder: r.responder,
                comments: r.comments,
                at: r.at.to_iso8601(),
            }),
            email_sent_at: snapshot.email_sent_at.map(|t| t.to_iso8601()),
            transition_log: snapshot
                .transition_log
                .into_iter()
                .map(|t| TransitionView {
                    from_state: t.from_state.name().to_string(),
                    to_state: t.to_state.name().to_string(),
                    timestamp: t.timestamp.to_iso8601(),
                    actor: t.actor,
                    reason: t.reason,
                })
                .collect(),
            created_at: snapshot.created_at.to_iso8601(),
        })
    }
}

/// Build the plans router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/plans", post(create_plan))
        .route("/v1/plans/{id}", get(get_plan))
        .route("/v1/plans/{id}/paint", post(paint))
        .route("/v1/plans/{id}/move", post(move_pallet))
        .route(
            "/v1/plans/{id}/sections/{section_id}/temperature",
            put(set_temperature),
        )
        .route("/v1/plans/{id}/transitions", post(transition_plan))
        .route("/v1/plans/{id}/revisions", post(revise_plan))
}

/// Run one mutation on a plan under its write lock, recompute, and
/// persist the result.
///
/// The full read-mutate-recompute-writeback cycle holds the per-plan
/// mutex, so concurrent edits to the same plan serialize; a recompute
/// failure leaves the plan persisted stale with its previous report.
fn with_plan_mut<F>(
    state: &AppState,
    id: PlanId,
    recompute: bool,
    mutate: F,
) -> Result<PlanView, AppError>
where
    F: FnOnce(&mut StowagePlan) -> Result<(), PlanError>,
{
    let lock = state.plan_lock(id);
    let _guard = lock.lock();

    let mut plan = state
        .plans
        .read()
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("plan {id} not found")))?;

    mutate(&mut plan)?;

    if recompute {
        let result = {
            let vessels = state.vessels.read();
            let voyages = state.voyages.read();
            let bookings = state.bookings.read();
            refresh_plan(&*vessels, &*voyages, &*bookings, &mut plan)
        };
        if let Err(e) = result {
            tracing::warn!(plan = %id, error = %e, "recompute failed, plan left stale");
        }
    }

    let view = PlanView::from_snapshot(plan.snapshot())?;
    state.plans.write().insert(id, plan);
    Ok(view)
}

/// Whether a plan still occupies its voyage's single active slot.
///
/// Rejected plans stay around for audit but hand the slot to their
/// revision, so they do not count as active.
fn is_active(plan: &StowagePlan) -> bool {
    !plan.status().is_terminal() && plan.status() != PlanStatus::CaptainRejected
}

/// POST /v1/plans — Create a DRAFT plan for a voyage.
#[utoipa::path(
    post,
    path = "/v1/plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created", body = PlanView),
        (status = 404, description = "Voyage not found", body = crate::error::ErrorBody),
        (status = 409, description = "Voyage already has an active plan", body = crate::error::ErrorBody),
    ),
    tag = "plans"
)]
pub(crate) async fn create_plan(
    State(state): State<AppState>,
    body: Result<Json<CreatePlanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlanView>), AppError> {
    let req = extract_validated_json(body)?;
    let voyage_id = VoyageId(req.voyage_id);

    // The voyage must exist before a plan gets a slot against it.
    state.voyages.read().voyage(&voyage_id)?;

    let mut plans = state.plans.write();
    if let Some(existing) = plans.values().find(|p| p.voyage_id() == voyage_id && is_active(p)) {
        return Err(AppError::Conflict(format!(
            "voyage {voyage_id} already has an active plan {} in state {}",
            existing.id(),
            existing.status()
        )));
    }

    let mut plan = StowagePlan::new_draft(voyage_id);
    {
        let vessels = state.vessels.read();
        let voyages = state.voyages.read();
        let bookings = state.bookings.read();
        if let Err(e) = refresh_plan(&*vessels, &*voyages, &*bookings, &mut plan) {
            tracing::warn!(plan = %plan.id(), error = %e, "initial recompute failed");
        }
    }

    let view = PlanView::from_snapshot(plan.snapshot())?;
    plans.insert(plan.id(), plan);
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /v1/plans/{id} — Full plan snapshot.
#[utoipa::path(
    get,
    path = "/v1/plans/{id}",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan found", body = PlanView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "plans"
)]
pub(crate) async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanView>, AppError> {
    let id = PlanId(id);
    let snapshot = state
        .plans
        .read()
        .get(&id)
        .map(|p| p.snapshot())
        .ok_or_else(|| AppError::NotFound(format!("plan {id} not found")))?;
    Ok(Json(PlanView::from_snapshot(snapshot)?))
}

/// POST /v1/plans/{id}/paint — Paint one pallet onto a cell.
#[utoipa::path(
    post,
    path = "/v1/plans/{id}/paint",
    params(("id" = Uuid, Path, description = "Plan ID")),
    request_body = PaintRequest,
    responses(
        (status = 200, description = "Edit committed, plan revalidated", body = PlanView),
        (status = 404, description = "Plan not found", body = crate::error::ErrorBody),
        (status = 409, description = "Plan locked for edits", body = crate::error::ErrorBody),
    ),
    tag = "plans"
)]
pub(crate) async fn paint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<PaintRequest>, JsonRejection>,
) -> Result<Json<PlanView>, AppError> {
    let req = extract_validated_json(body)?;
    let cell = req.cell.parse()?;
    let booking = BookingId(req.booking_id);
    let view = with_plan_mut(&state, PlanId(id), true, |plan| plan.paint(&cell, booking))?;
    Ok(Json(view))
}

/// POST /v1/plans/{id}/move — Move or swap a placed pallet.
#[utoipa::path(
    post,
    path = "/v1/plans/{id}/move",
    params(("id" = Uuid, Path, description = "Plan ID")),
    request_body = MoveRequest,
    responses(
        (status = 200, description = "Edit committed, plan revalidated", body = PlanView),
        (status = 404, description = "Plan not found", body = crate::error::ErrorBody),
        (status = 409, description = "Plan locked for edits", body = crate::error::ErrorBody),
    ),
    tag = "plans"
)]
pub(crate) async fn move_pallet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<PlanView>, AppError> {
    let req = extract_validated_json(body)?;
    let source = req.source.parse()?;
    let dest = req.dest.parse()?;
    let view = with_plan_mut(&state, PlanId(id), true, |plan| {
        plan.move_or_swap(&source, &dest)
    })?;
    Ok(Json(view))
}

/// PUT /v1/plans/{id}/sections/{section_id}/temperature — Assign a
/// cooling-section set-point.
#[utoipa::path(
    put,
    path = "/v1/plans/{id}/sections/{section_id}/temperature",
    params(
        ("id" = Uuid, Path, description = "Plan ID"),
        ("section_id" = String, Path, description = "Cooling section ID"),
    ),
    request_body = SetTemperatureRequest,
    responses(
        (status = 200, description = "Set-point assigned, plan revalidated", body = PlanView),
        (status = 404, description = "Plan or section not found", body = crate::error::ErrorBody),
        (status = 409, description = "Plan locked for edits", body = crate::error::ErrorBody),
    ),
    tag = "plans"
)]
pub(crate) async fn set_temperature(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, String)>,
    body: Result<Json<SetTemperatureRequest>, JsonRejection>,
) -> Result<Json<PlanView>, AppError> {
    let req = extract_validated_json(body)?;
    let id = PlanId(id);
    let section_id =
        CoolingSectionId::new(&section_id).map_err(|e| AppError::Validation(e.to_string()))?;

    // The section must exist on the voyage's vessel.
    {
        let voyage_id = state
            .plans
            .read()
            .get(&id)
            .map(|p| p.voyage_id())
            .ok_or_else(|| AppError::NotFound(format!("plan {id} not found")))?;
        let voyage = state.voyages.read().voyage(&voyage_id)?;
        let layout = state.vessels.read().vessel(&voyage.vessel_id)?;
        if layout.section(&section_id).is_none() {
            return Err(AppError::NotFound(format!(
                "cooling section {section_id} not found on vessel {}",
                layout.name
            )));
        }
    }

    let assignment = SectionTemperature {
        section_id,
        set_point: Celsius(req.set_point_celsius),
    };
    let view = with_plan_mut(&state, id, true, |plan| {
        plan.set_section_temperature(assignment.clone())
    })?;
    Ok(Json(view))
}

/// POST /v1/plans/{id}/transitions — Transition the plan's lifecycle
/// state.
///
/// Captain decisions (`CAPTAIN_APPROVED`, `CAPTAIN_REJECTED`) go through
/// the same endpoint: `actor` is the responding master and `reason`
/// carries the captain's comments verbatim.
#[utoipa::path(
    post,
    path = "/v1/plans/{id}/transitions",
    params(("id" = Uuid, Path, description = "Plan ID")),
    request_body = TransitionPlanRequest,
    responses(
        (status = 200, description = "Transition committed", body = PlanView),
        (status = 404, description = "Plan not found", body = crate::error::ErrorBody),
        (status = 409, description = "Transition not in the lifecycle", body = crate::error::ErrorBody),
        (status = 422, description = "Guard precondition unmet", body = crate::error::ErrorBody),
    ),
    tag = "plans"
)]
pub(crate) async fn transition_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<TransitionPlanRequest>, JsonRejection>,
) -> Result<Json<PlanView>, AppError> {
    let req = extract_validated_json(body)?;
    let target: PlanStatus = req
        .target_state
        .parse()
        .map_err(AppError::Validation)?;

    let view = with_plan_mut(&state, PlanId(id), false, |plan| match target {
        PlanStatus::CaptainApproved | PlanStatus::CaptainRejected => plan.record_captain_response(
            CaptainResponse {
                responder: req.actor.clone(),
                comments: req.reason.clone().unwrap_or_default(),
                at: Timestamp::now(),
            },
            target == PlanStatus::CaptainApproved,
        ),
        _ => plan.try_transition(target, req.actor.clone(), req.reason.clone()),
    })?;
    Ok(Json(view))
}

/// POST /v1/plans/{id}/revisions — Create a revision copy of a rejected
/// plan.
#[utoipa::path(
    post,
    path = "/v1/plans/{id}/revisions",
    params(("id" = Uuid, Path, description = "Rejected plan ID")),
    responses(
        (status = 201, description = "Revision created", body = PlanView),
        (status = 404, description = "Plan not found", body = crate::error::ErrorBody),
        (status = 409, description = "Plan is not rejected", body = crate::error::ErrorBody),
    ),
    tag = "plans"
)]
pub(crate) async fn revise_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<PlanView>), AppError> {
    let id = PlanId(id);
    let lock = state.plan_lock(id);
    let _guard = lock.lock();

    let original = state
        .plans
        .read()
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("plan {id} not found")))?;

    let mut revision = original.revise()?;
    {
        let vessels = state.vessels.read();
        let voyages = state.voyages.read();
        let bookings = state.bookings.read();
        if let Err(e) = refresh_plan(&*vessels, &*voyages, &*bookings, &mut revision) {
            tracing::warn!(plan = %revision.id(), error = %e, "initial recompute failed");
        }
    }

    let view = PlanView::from_snapshot(revision.snapshot())?;
    state.plans.write().insert(revision.id(), revision);
    Ok((StatusCode::CREATED, Json(view)))
}

//! # Stowage Plan & Lifecycle State Machine
//!
//! A [`StowagePlan`] owns everything the planner produces for one voyage:
//! the position snapshot, the section set-points, the latest validation
//! report, and the lifecycle state from DRAFT through captain review to
//! execution.
//!
//! The state machine is a runtime transition table, not typestate: the
//! hand-over guard depends on the *current* validation report, which only
//! exists at runtime. Guards run before any write, so a rejected
//! transition leaves the plan byte-identical. Every successful transition
//! appends a [`TransitionRecord`], and captain decisions carry a
//! [`CaptainResponse`] recorded through [`StowagePlan::record_captain_response`]
//! rather than a bare transition.
//!
//! Revisions are never in-place: [`StowagePlan::revise`] on a rejected
//! plan produces a fresh plan with a `previous_plan_id` back-reference,
//! leaving the rejected plan (and its transition log) untouched for audit.

use serde::{Deserialize, Serialize};
use tracing::info;

use reefstow_core::{BookingId, PlanId, Timestamp, VoyageId};

use crate::cooling::SectionTemperature;
use crate::error::PlanError;
use crate::placement::{self, CellRef};
use crate::position::{CargoPosition, PositionSet};
use crate::recompute::ValidationReport;

/// Lifecycle states of a stowage plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    /// Machine-generated first cut, not yet touched by a planner.
    Estimated,
    /// Open for planner editing.
    Draft,
    /// Validation passed; awaiting dispatch to the captain.
    ReadyForCaptain,
    /// Review request sent; awaiting the captain's decision.
    EmailSent,
    /// Captain signed off.
    CaptainApproved,
    /// Captain pushed back; a revision is expected.
    CaptainRejected,
    /// A revision copy being reworked after rejection.
    InRevision,
    /// Approved and scheduled for loading operations.
    ReadyForExecution,
    /// Loading in progress.
    InExecution,
    /// Voyage loaded and closed out. Terminal.
    Completed,
    /// Abandoned at any pre-terminal point. Terminal.
    Cancelled,
}

impl PlanStatus {
    /// Every state, in lifecycle order.
    pub fn all() -> &'static [PlanStatus] {
        &[
            PlanStatus::Estimated,
            PlanStatus::Draft,
            PlanStatus::ReadyForCaptain,
            PlanStatus::EmailSent,
            PlanStatus::CaptainApproved,
            PlanStatus::CaptainRejected,
            PlanStatus::InRevision,
            PlanStatus::ReadyForExecution,
            PlanStatus::InExecution,
            PlanStatus::Completed,
            PlanStatus::Cancelled,
        ]
    }

    /// Canonical wire name.
    pub fn name(&self) -> &'static str {
        match self {
            PlanStatus::Estimated => "ESTIMATED",
            PlanStatus::Draft => "DRAFT",
            PlanStatus::ReadyForCaptain => "READY_FOR_CAPTAIN",
            PlanStatus::EmailSent => "EMAIL_SENT",
            PlanStatus::CaptainApproved => "CAPTAIN_APPROVED",
            PlanStatus::CaptainRejected => "CAPTAIN_REJECTED",
            PlanStatus::InRevision => "IN_REVISION",
            PlanStatus::ReadyForExecution => "READY_FOR_EXECUTION",
            PlanStatus::InExecution => "IN_EXECUTION",
            PlanStatus::Completed => "COMPLETED",
            PlanStatus::Cancelled => "CANCELLED",
        }
    }

    /// No transitions leave a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlanStatus::Completed | PlanStatus::Cancelled)
    }

    /// Whether placement and temperature edits are permitted.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            PlanStatus::Draft | PlanStatus::Estimated | PlanStatus::InRevision
        )
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlanStatus::all()
            .iter()
            .find(|status| status.name() == s)
            .copied()
            .ok_or_else(|| format!("unknown plan status: {s}"))
    }
}

/// One entry of the append-only transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition.
    pub from_state: PlanStatus,
    /// State after the transition.
    pub to_state: PlanStatus,
    /// When the transition was committed.
    pub timestamp: Timestamp,
    /// Who triggered it.
    pub actor: String,
    /// Free-text context, if any was given.
    pub reason: Option<String>,
}

/// The captain's decision on a dispatched plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptainResponse {
    /// Name of the responding master.
    pub responder: String,
    /// The captain's comments, verbatim.
    pub comments: String,
    /// When the response arrived.
    pub at: Timestamp,
}

/// Serializable full view of a plan for UI and notification consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub id: PlanId,
    pub voyage_id: VoyageId,
    pub previous_plan_id: Option<PlanId>,
    pub revision: u32,
    pub status: PlanStatus,
    pub positions: Vec<CargoPosition>,
    pub section_temperatures: Vec<SectionTemperature>,
    pub report: Option<ValidationReport>,
    pub stale: bool,
    pub captain_response: Option<CaptainResponse>,
    pub email_sent_at: Option<Timestamp>,
    pub transition_log: Vec<TransitionRecord>,
    pub created_at: Timestamp,
}

/// A stowage plan for one voyage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StowagePlan {
    id: PlanId,
    voyage_id: VoyageId,
    previous_plan_id: Option<PlanId>,
    revision: u32,
    status: PlanStatus,
    positions: PositionSet,
    section_temperatures: Vec<SectionTemperature>,
    report: Option<ValidationReport>,
    stale: bool,
    captain_response: Option<CaptainResponse>,
    email_sent_at: Option<Timestamp>,
    transition_log: Vec<TransitionRecord>,
    created_at: Timestamp,
}

impl StowagePlan {
    /// A fresh, empty DRAFT plan, revision 1.
    pub fn new_draft(voyage_id: VoyageId) -> Self {
        Self {
            id: PlanId::new(),
            voyage_id,
            previous_plan_id: None,
            revision: 1,
            status: PlanStatus::Draft,
            positions: PositionSet::empty(),
            section_temperatures: Vec::new(),
            report: None,
            stale: false,
            captain_response: None,
            email_sent_at: None,
            transition_log: Vec::new(),
            created_at: Timestamp::now(),
        }
    }

    /// A machine-generated first cut, revision 1, in ESTIMATED state.
    ///
    /// The seed positions come from an automated stow suggestion rather
    /// than a planner. The plan is editable immediately; taking it to
    /// DRAFT marks the moment a planner adopts it.
    pub fn new_estimated(voyage_id: VoyageId, positions: PositionSet) -> Self {
        Self {
            positions,
            status: PlanStatus::Estimated,
            ..Self::new_draft(voyage_id)
        }
    }

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn voyage_id(&self) -> VoyageId {
        self.voyage_id
    }

    pub fn previous_plan_id(&self) -> Option<PlanId> {
        self.previous_plan_id
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn status(&self) -> PlanStatus {
        self.status
    }

    /// The committed position snapshot.
    pub fn positions(&self) -> &PositionSet {
        &self.positions
    }

    /// Planner-assigned section set-points.
    pub fn section_temperatures(&self) -> &[SectionTemperature] {
        &self.section_temperatures
    }

    /// The latest validation report, if a recompute has run.
    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    /// Whether the report no longer reflects the plan's current state.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn captain_response(&self) -> Option<&CaptainResponse> {
        self.captain_response.as_ref()
    }

    pub fn email_sent_at(&self) -> Option<Timestamp> {
        self.email_sent_at
    }

    pub fn transition_log(&self) -> &[TransitionRecord] {
        &self.transition_log
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    // ------------------------------------------------------------------
    // Placement edits
    // ------------------------------------------------------------------

    fn ensure_editable(&self) -> Result<(), PlanError> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(PlanError::PlanLocked {
                status: self.status,
            })
        }
    }

    /// Commit one paint stroke. Any change invalidates the report.
    pub fn paint(&mut self, cell: &CellRef, booking: BookingId) -> Result<(), PlanError> {
        self.ensure_editable()?;
        self.positions = placement::apply_paint(&self.positions, cell, booking);
        self.stale = true;
        Ok(())
    }

    /// Commit one move/swap gesture. Any change invalidates the report.
    pub fn move_or_swap(&mut self, source: &CellRef, dest: &CellRef) -> Result<(), PlanError> {
        self.ensure_editable()?;
        self.positions = placement::apply_move_or_swap(&self.positions, source, dest);
        self.stale = true;
        Ok(())
    }

    /// Assign or replace one section's set-point.
    pub fn set_section_temperature(
        &mut self,
        assignment: SectionTemperature,
    ) -> Result<(), PlanError> {
        self.ensure_editable()?;
        match self
            .section_temperatures
            .iter_mut()
            .find(|a| a.section_id == assignment.section_id)
        {
            Some(existing) => *existing = assignment,
            None => self.section_temperatures.push(assignment),
        }
        self.stale = true;
        Ok(())
    }

    /// Install a freshly computed report, clearing the stale flag.
    pub fn apply_report(&mut self, report: ValidationReport) {
        self.report = Some(report);
        self.stale = false;
    }

    /// Flag the current report as out of date without touching it.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// The review-readiness guard: a current, clean validation report.
    ///
    /// This is also the double-allocation cross-check surfaced as its own
    /// operation; over-allocated bookings fail it like any conflict.
    pub fn finalize_check(&self) -> Result<(), String> {
        let report = match &self.report {
            Some(r) => r,
            None => return Err("no validation report; recompute before review".into()),
        };
        if self.stale {
            return Err("validation report is stale; recompute before review".into());
        }
        match report.blocking_summary() {
            None => Ok(()),
            Some(summary) => Err(summary),
        }
    }

    /// Attempt a lifecycle transition.
    ///
    /// Guards run first; on any error the plan is unchanged. Captain
    /// decisions cannot be reached this way, use
    /// [`record_captain_response`](Self::record_captain_response).
    pub fn try_transition(
        &mut self,
        to: PlanStatus,
        actor: impl Into<String>,
        reason: Option<String>,
    ) -> Result<(), PlanError> {
        let from = self.status;
        let invalid = |reason: &str| PlanError::InvalidTransition {
            from: from.name().into(),
            to: to.name().into(),
            reason: reason.into(),
        };

        if from.is_terminal() {
            return Err(invalid("plan is in a terminal state"));
        }

        match (from, to) {
            (_, PlanStatus::CaptainApproved) | (_, PlanStatus::CaptainRejected) => {
                return Err(invalid(
                    "captain decisions are recorded with a captain response",
                ));
            }
            (_, PlanStatus::Cancelled) => {}
            (PlanStatus::Estimated, PlanStatus::Draft) => {}
            (
                PlanStatus::Draft | PlanStatus::Estimated | PlanStatus::InRevision,
                PlanStatus::ReadyForCaptain,
            ) => {
                if let Err(unmet) = self.finalize_check() {
                    return Err(PlanError::TransitionBlocked {
                        from: from.name().into(),
                        to: to.name().into(),
                        reason: unmet,
                    });
                }
            }
            (PlanStatus::ReadyForCaptain, PlanStatus::EmailSent) => {}
            (PlanStatus::CaptainApproved, PlanStatus::ReadyForExecution) => {}
            (PlanStatus::ReadyForExecution, PlanStatus::InExecution) => {}
            (PlanStatus::InExecution, PlanStatus::Completed) => {}
            _ => return Err(invalid("no such transition in the plan lifecycle")),
        }

        self.commit_transition(to, actor.into(), reason);
        if to == PlanStatus::EmailSent {
            self.email_sent_at = Some(Timestamp::now());
        }
        Ok(())
    }

    /// Record the captain's decision on a dispatched plan.
    ///
    /// Only valid in EMAIL_SENT; moves to CAPTAIN_APPROVED or
    /// CAPTAIN_REJECTED and stores the response verbatim.
    pub fn record_captain_response(
        &mut self,
        response: CaptainResponse,
        approved: bool,
    ) -> Result<(), PlanError> {
        let to = if approved {
            PlanStatus::CaptainApproved
        } else {
            PlanStatus::CaptainRejected
        };
        if self.status != PlanStatus::EmailSent {
            return Err(PlanError::InvalidTransition {
                from: self.status.name().into(),
                to: to.name().into(),
                reason: "captain responses are only accepted after dispatch".into(),
            });
        }
        let actor = response.responder.clone();
        let reason = Some(response.comments.clone());
        self.captain_response = Some(response);
        self.commit_transition(to, actor, reason);
        Ok(())
    }

    /// Produce a revision copy of a rejected plan.
    ///
    /// The rejected plan is left untouched; the copy starts IN_REVISION
    /// with the same positions and set-points, a bumped revision number,
    /// a back-reference, and an empty transition log of its own.
    pub fn revise(&self) -> Result<StowagePlan, PlanError> {
        if self.status != PlanStatus::CaptainRejected {
            return Err(PlanError::InvalidTransition {
                from: self.status.name().into(),
                to: PlanStatus::InRevision.name().into(),
                reason: "only a rejected plan can be revised".into(),
            });
        }
        Ok(StowagePlan {
            id: PlanId::new(),
            voyage_id: self.voyage_id,
            previous_plan_id: Some(self.id),
            revision: self.revision + 1,
            status: PlanStatus::InRevision,
            positions: self.positions.clone(),
            section_temperatures: self.section_temperatures.clone(),
            report: None,
            stale: false,
            captain_response: None,
            email_sent_at: None,
            transition_log: Vec::new(),
            created_at: Timestamp::now(),
        })
    }

    /// Serializable full view for collaborators.
    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            id: self.id,
            voyage_id: self.voyage_id,
            previous_plan_id: self.previous_plan_id,
            revision: self.revision,
            status: self.status,
            positions: self.positions.positions().to_vec(),
            section_temperatures: self.section_temperatures.clone(),
            report: self.report.clone(),
            stale: self.stale,
            captain_response: self.captain_response.clone(),
            email_sent_at: self.email_sent_at,
            transition_log: self.transition_log.clone(),
            created_at: self.created_at,
        }
    }

    fn commit_transition(&mut self, to: PlanStatus, actor: String, reason: Option<String>) {
        let from = self.status;
        self.status = to;
        self.transition_log.push(TransitionRecord {
            from_state: from,
            to_state: to,
            timestamp: Timestamp::now(),
            actor: actor.clone(),
            reason,
        });
        info!(plan = %self.id, %from, %to, %actor, "plan transition");
    }
}

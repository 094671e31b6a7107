use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::id::{ReservationId, UserId};
use crate::model::reservation::ReservationState;

/// Emitted once per state transition for the external notification
/// collaborator. The engine's responsibility ends at emission; delivery is
/// at-least-once on the collaborator's side and never rolls a transition
/// back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionNotice {
    pub reservation_id: ReservationId,
    /// `None` when the transition is the initial submission.
    pub previous_state: Option<ReservationState>,
    pub new_state: ReservationState,
    pub actor: Actor,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl TransitionNotice {
    pub fn submitted(reservation_id: ReservationId, actor: Actor) -> Self {
        Self {
            reservation_id,
            previous_state: None,
            new_state: ReservationState::Pending,
            actor,
            reason: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn transitioned(
        reservation_id: ReservationId,
        previous_state: ReservationState,
        new_state: ReservationState,
        actor: Actor,
        reason: Option<String>,
    ) -> Self {
        Self {
            reservation_id,
            previous_state: Some(previous_state),
            new_state,
            actor,
            reason,
            occurred_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Actor {
    System,
    User(UserId),
    Admin(UserId),
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{Display, EnumString};

use crate::model::id::{ReservationId, SpaceId, UserId};
use crate::model::interval::TimeWindow;

pub mod event;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[sqlx(type_name = "reservation_state", rename_all = "lowercase")]
pub enum ReservationState {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ReservationState {
    /// States that keep a slot occupied for overlap purposes.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, ReservationState::Pending | ReservationState::Approved)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationState::Rejected | ReservationState::Cancelled)
    }

    /// Applies a transition command to the current state.
    ///
    /// Retrying a command whose target state was already reached is a no-op,
    /// so callers can safely resubmit after a lost response. Anything else
    /// from a non-`pending` state is a state conflict.
    pub fn apply(self, command: &TransitionCommand<'_>) -> AppResult<Transition> {
        use ReservationState::*;

        if let TransitionCommand::Reject { reason } = command {
            if reason.trim().is_empty() {
                return Err(AppError::UnprocessableEntity(
                    "a rejection requires a non-empty reason".into(),
                ));
            }
        }

        let target = command.target();
        if self == target {
            return Ok(Transition::AlreadyApplied);
        }
        match self {
            Pending => Ok(Transition::Changed(target)),
            Approved | Rejected | Cancelled => Err(AppError::IllegalTransition(format!(
                "cannot {command} a reservation in state '{self}'"
            ))),
        }
    }
}

#[derive(Debug)]
pub enum TransitionCommand<'a> {
    Approve,
    Reject { reason: &'a str },
    Cancel,
}

impl TransitionCommand<'_> {
    pub fn target(&self) -> ReservationState {
        match self {
            TransitionCommand::Approve => ReservationState::Approved,
            TransitionCommand::Reject { .. } => ReservationState::Rejected,
            TransitionCommand::Cancel => ReservationState::Cancelled,
        }
    }
}

impl std::fmt::Display for TransitionCommand<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            TransitionCommand::Approve => "approve",
            TransitionCommand::Reject { .. } => "reject",
            TransitionCommand::Cancel => "cancel",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Transition {
    Changed(ReservationState),
    AlreadyApplied,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[sqlx(type_name = "event_type", rename_all = "lowercase")]
pub enum EventType {
    Academic,
    Cultural,
    Sports,
    Administrative,
}

#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: ReservationId,
    pub space_id: SpaceId,
    pub requested_by: UserId,
    pub window: TimeWindow,
    pub event_type: EventType,
    pub expected_attendance: i32,
    pub state: ReservationState,
    pub rejection_reason: Option<String>,
    pub document_refs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Identifier plus occupied window, for conflict reports. Carrying the
    /// window spares the caller a follow-up lookup per conflicting id.
    pub fn conflict_entry(&self) -> String {
        format!(
            "{} [{} - {})",
            self.id,
            self.window.start(),
            self.window.end()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_approved() {
        let next = ReservationState::Pending
            .apply(&TransitionCommand::Approve)
            .unwrap();
        assert_eq!(next, Transition::Changed(ReservationState::Approved));
    }

    #[test]
    fn pending_can_be_rejected_or_cancelled() {
        let rejected = ReservationState::Pending
            .apply(&TransitionCommand::Reject { reason: "slot taken" })
            .unwrap();
        assert_eq!(rejected, Transition::Changed(ReservationState::Rejected));

        let cancelled = ReservationState::Pending
            .apply(&TransitionCommand::Cancel)
            .unwrap();
        assert_eq!(cancelled, Transition::Changed(ReservationState::Cancelled));
    }

    #[test]
    fn terminal_states_refuse_other_transitions() {
        for state in [
            ReservationState::Approved,
            ReservationState::Rejected,
            ReservationState::Cancelled,
        ] {
            let commands = [
                TransitionCommand::Approve,
                TransitionCommand::Reject { reason: "r" },
                TransitionCommand::Cancel,
            ];
            for command in commands {
                let result = state.apply(&command);
                if command.target() == state {
                    assert_eq!(result.unwrap(), Transition::AlreadyApplied);
                } else {
                    assert!(matches!(result, Err(AppError::IllegalTransition(_))));
                }
            }
        }
    }

    #[test]
    fn retrying_a_reached_transition_is_a_no_op() {
        let retried = ReservationState::Approved
            .apply(&TransitionCommand::Approve)
            .unwrap();
        assert_eq!(retried, Transition::AlreadyApplied);
    }

    #[test]
    fn rejecting_without_a_reason_is_refused() {
        let result = ReservationState::Pending.apply(&TransitionCommand::Reject { reason: "  " });
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[test]
    fn only_pending_and_approved_block_the_slot() {
        assert!(ReservationState::Pending.blocks_slot());
        assert!(ReservationState::Approved.blocks_slot());
        assert!(!ReservationState::Rejected.blocks_slot());
        assert!(!ReservationState::Cancelled.blocks_slot());
    }

    #[test]
    fn conflict_entries_carry_the_id_and_the_window() {
        use chrono::TimeZone;

        let start = Utc.with_ymd_and_hms(2025, 6, 5, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 5, 12, 0, 0).unwrap();
        let reservation = Reservation {
            id: ReservationId::new(),
            space_id: SpaceId::new(),
            requested_by: UserId::new(),
            window: TimeWindow::new(start, end).unwrap(),
            event_type: EventType::Academic,
            expected_attendance: 10,
            state: ReservationState::Pending,
            rejection_reason: None,
            document_refs: vec![],
            created_at: Utc::now(),
        };

        let entry = reservation.conflict_entry();
        assert!(entry.starts_with(&reservation.id.to_string()));
        assert!(entry.contains(&start.to_string()));
        assert!(entry.contains(&end.to_string()));
    }
}

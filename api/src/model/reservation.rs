use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{ReservationId, SpaceId, UserId},
    occupancy::OccupancySlot,
    policy::RuleViolation,
    reservation::{EventType, Reservation, ReservationState},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub space_id: SpaceId,
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(skip)]
    pub event_type: EventType,
    #[garde(range(min = 1))]
    pub expected_attendance: i32,
    #[garde(skip)]
    #[serde(default)]
    pub document_refs: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectReservationRequest {
    #[garde(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListQuery {
    pub state: ReservationState,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: ReservationId,
    pub space_id: SpaceId,
    pub requested_by: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub event_type: EventType,
    pub expected_attendance: i32,
    pub state: ReservationState,
    pub rejection_reason: Option<String>,
    pub document_refs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            id,
            space_id,
            requested_by,
            window,
            event_type,
            expected_attendance,
            state,
            rejection_reason,
            document_refs,
            created_at,
        } = value;
        Self {
            id,
            space_id,
            requested_by,
            start_time: window.start(),
            end_time: window.end(),
            event_type,
            expected_attendance,
            state,
            rejection_reason,
            document_refs,
            created_at,
        }
    }
}

/// The approval response carries the reservations that were auto-rejected
/// so an administrator sees exactly which competing requests lost the slot.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResponse {
    pub reservation: ReservationResponse,
    pub displaced: Vec<ReservationResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendance: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    pub conflicts: Vec<ReservationResponse>,
    pub violations: Vec<String>,
}

impl AvailabilityResponse {
    pub fn new(conflicts: Vec<Reservation>, violations: Vec<RuleViolation>) -> Self {
        Self {
            available: conflicts.is_empty() && violations.is_empty(),
            conflicts: conflicts
                .into_iter()
                .map(ReservationResponse::from)
                .collect(),
            violations: violations.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: i64,
}

fn default_slot_minutes() -> i64 {
    60
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyResponse {
    pub slots: Vec<OccupancySlotResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancySlotResponse {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub occupied: bool,
    pub state: Option<ReservationState>,
}

impl From<Vec<OccupancySlot>> for OccupancyResponse {
    fn from(value: Vec<OccupancySlot>) -> Self {
        Self {
            slots: value
                .into_iter()
                .map(|slot| OccupancySlotResponse {
                    start: slot.window.start(),
                    end: slot.window.end(),
                    occupied: slot.occupied,
                    state: slot.state,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garde::Validate;

    #[test]
    fn reject_request_requires_a_reason() {
        let req = RejectReservationRequest { reason: "".into() };
        assert!(req.validate(&()).is_err());

        let req = RejectReservationRequest {
            reason: "equipment unavailable".into(),
        };
        assert!(req.validate(&()).is_ok());
    }

    #[test]
    fn attendance_must_be_positive() {
        let req: CreateReservationRequest = serde_json::from_value(serde_json::json!({
            "spaceId": uuid::Uuid::new_v4(),
            "startTime": "2025-06-05T10:00:00Z",
            "endTime": "2025-06-05T12:00:00Z",
            "eventType": "academic",
            "expectedAttendance": 0
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn reservation_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReservationState::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&ReservationState::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}

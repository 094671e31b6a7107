use derive_new::new;

use crate::model::id::{ReservationId, SpaceId, UserId};
use crate::model::interval::TimeWindow;
use crate::model::reservation::EventType;
use crate::model::role::Role;

#[derive(new)]
pub struct CreateReservation {
    pub space_id: SpaceId,
    pub requested_by: UserId,
    pub window: TimeWindow,
    pub event_type: EventType,
    pub expected_attendance: i32,
    pub document_refs: Vec<String>,
}

#[derive(new)]
pub struct ApproveReservation {
    pub reservation_id: ReservationId,
    pub approved_by: UserId,
}

#[derive(new)]
pub struct RejectReservation {
    pub reservation_id: ReservationId,
    pub rejected_by: UserId,
    pub reason: String,
}

#[derive(new)]
pub struct CancelReservation {
    pub reservation_id: ReservationId,
    pub requested_by: UserId,
    pub requested_as: Role,
}

use chrono::{DateTime, Utc};
use kernel::model::{
    id::{ReservationId, SpaceId, UserId},
    interval::TimeWindow,
    reservation::{EventType, Reservation, ReservationState},
};
use shared::error::{AppError, AppResult};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub space_id: SpaceId,
    pub requested_by: UserId,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub event_type: EventType,
    pub expected_attendance: i32,
    pub state: ReservationState,
    pub rejection_reason: Option<String>,
    pub document_refs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    // Stored rows satisfy end > start by construction, but the window is
    // still rebuilt through the validating constructor instead of trusted.
    fn try_from(value: ReservationRow) -> AppResult<Self> {
        let ReservationRow {
            reservation_id,
            space_id,
            requested_by,
            start_at,
            end_at,
            event_type,
            expected_attendance,
            state,
            rejection_reason,
            document_refs,
            created_at,
        } = value;
        Ok(Reservation {
            id: reservation_id,
            space_id,
            requested_by,
            window: TimeWindow::new(start_at, end_at)?,
            event_type,
            expected_attendance,
            state,
            rejection_reason,
            document_refs,
            created_at,
        })
    }
}

pub fn rows_into_reservations(rows: Vec<ReservationRow>) -> AppResult<Vec<Reservation>> {
    rows.into_iter().map(Reservation::try_from).collect()
}

use chrono::Duration;
use shared::error::{AppError, AppResult};

use crate::model::interval::TimeWindow;
use crate::model::reservation::{Reservation, ReservationState};

/// One cell of the calendar grid. `state` is set when the slot is occupied
/// by a pending or approved reservation; approved wins when both cover the
/// same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancySlot {
    pub window: TimeWindow,
    pub occupied: bool,
    pub state: Option<ReservationState>,
}

/// Read-only projection of a space's reservations onto fixed-size slots.
/// Purely derived data for calendar rendering; never mutates anything.
pub fn occupancy_grid(
    reservations: &[Reservation],
    range: TimeWindow,
    slot_granularity: Duration,
) -> AppResult<Vec<OccupancySlot>> {
    if slot_granularity <= Duration::zero() {
        return Err(AppError::UnprocessableEntity(
            "slot granularity must be positive".into(),
        ));
    }

    let mut grid = Vec::new();
    let mut slot_start = range.start();
    while slot_start < range.end() {
        let slot_end = (slot_start + slot_granularity).min(range.end());
        let window = TimeWindow::new(slot_start, slot_end)?;

        let state = reservations
            .iter()
            .filter(|r| r.state.blocks_slot() && r.window.overlaps(&window))
            .map(|r| r.state)
            .max_by_key(|state| matches!(state, ReservationState::Approved));

        grid.push(OccupancySlot {
            window,
            occupied: state.is_some(),
            state,
        });
        slot_start = slot_end;
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::id::{ReservationId, SpaceId, UserId};
    use crate::model::reservation::EventType;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 5, hour, 0, 0).unwrap()
    }

    fn reservation(start: u32, end: u32, state: ReservationState) -> Reservation {
        Reservation {
            id: ReservationId::new(),
            space_id: SpaceId::new(),
            requested_by: UserId::new(),
            window: TimeWindow::new(at(start), at(end)).unwrap(),
            event_type: EventType::Academic,
            expected_attendance: 10,
            state,
            rejection_reason: None,
            document_refs: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_reservation_set_yields_a_free_grid() {
        let range = TimeWindow::new(at(8), at(12)).unwrap();
        let grid = occupancy_grid(&[], range, Duration::hours(1)).unwrap();
        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(|slot| !slot.occupied));
    }

    #[test]
    fn occupied_slots_carry_the_reservation_state() {
        let range = TimeWindow::new(at(8), at(14)).unwrap();
        let reservations = [reservation(10, 12, ReservationState::Approved)];
        let grid = occupancy_grid(&reservations, range, Duration::hours(1)).unwrap();

        let occupied: Vec<_> = grid.iter().filter(|slot| slot.occupied).collect();
        assert_eq!(occupied.len(), 2);
        assert!(occupied
            .iter()
            .all(|slot| slot.state == Some(ReservationState::Approved)));
    }

    #[test]
    fn terminal_reservations_do_not_occupy_slots() {
        let range = TimeWindow::new(at(8), at(14)).unwrap();
        let reservations = [
            reservation(9, 10, ReservationState::Rejected),
            reservation(11, 12, ReservationState::Cancelled),
        ];
        let grid = occupancy_grid(&reservations, range, Duration::hours(1)).unwrap();
        assert!(grid.iter().all(|slot| !slot.occupied));
    }

    #[test]
    fn approved_takes_precedence_over_pending() {
        let range = TimeWindow::new(at(10), at(11)).unwrap();
        let reservations = [
            reservation(10, 11, ReservationState::Pending),
            reservation(10, 11, ReservationState::Approved),
        ];
        let grid = occupancy_grid(&reservations, range, Duration::hours(1)).unwrap();
        assert_eq!(grid[0].state, Some(ReservationState::Approved));
    }

    #[test]
    fn the_last_slot_is_clamped_to_the_range_end() {
        let range = TimeWindow::new(at(8), at(9)).unwrap();
        let grid = occupancy_grid(&[], range, Duration::minutes(40)).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1].window.duration(), Duration::minutes(20));
    }

    #[test]
    fn a_non_positive_granularity_is_refused() {
        let range = TimeWindow::new(at(8), at(9)).unwrap();
        assert!(occupancy_grid(&[], range, Duration::zero()).is_err());
    }
}

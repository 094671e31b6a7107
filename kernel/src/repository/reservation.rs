use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::id::{ReservationId, SpaceId, UserId};
use crate::model::interval::TimeWindow;
use crate::model::reservation::{
    event::{ApproveReservation, CancelReservation, CreateReservation, RejectReservation},
    Reservation, ReservationState,
};

/// Result of an approval: the approved record plus every still-pending
/// reservation that was auto-rejected because it overlapped the approved
/// window. `changed` is false when the request was an idempotent retry, so
/// callers know not to re-emit notifications.
#[derive(Debug)]
pub struct ApprovalOutcome {
    pub approved: Reservation,
    pub displaced: Vec<Reservation>,
    pub changed: bool,
}

#[derive(Debug)]
pub struct TransitionOutcome {
    pub reservation: Reservation,
    pub changed: bool,
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Submits a candidate reservation. Policy evaluation, the overlap
    /// check and the insert run in one critical section scoped to the
    /// space, so two near-simultaneous submissions cannot both slip past
    /// the conflict check.
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;

    /// Approves a pending reservation and, within the same critical
    /// section, rejects every overlapping reservation that is still
    /// pending for the same space.
    async fn approve(&self, event: ApproveReservation) -> AppResult<ApprovalOutcome>;

    async fn reject(&self, event: RejectReservation) -> AppResult<TransitionOutcome>;

    /// Owner-initiated cancellation; administrators may cancel on a
    /// requester's behalf.
    async fn cancel(&self, event: CancelReservation) -> AppResult<TransitionOutcome>;

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;

    /// Pending and approved reservations for the space that overlap the
    /// window. Feeds the interactive availability check.
    async fn find_overlapping(
        &self,
        space_id: SpaceId,
        window: TimeWindow,
    ) -> AppResult<Vec<Reservation>>;

    /// Slot-blocking reservations intersecting the range, for the
    /// occupancy grid projection.
    async fn find_in_range(
        &self,
        space_id: SpaceId,
        range: TimeWindow,
    ) -> AppResult<Vec<Reservation>>;

    async fn find_by_requester(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;

    async fn find_by_state(&self, state: ReservationState) -> AppResult<Vec<Reservation>>;
}

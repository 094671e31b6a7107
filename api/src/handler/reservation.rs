use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use garde::Validate;
use kernel::model::{
    id::{ReservationId, SpaceId},
    interval::TimeWindow,
    notification::{Actor, TransitionNotice},
    occupancy::occupancy_grid,
    policy::{self, ReservationDraft},
    reservation::{
        event::{ApproveReservation, CancelReservation, CreateReservation, RejectReservation},
        ReservationState,
    },
    space::Space,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::reservation::{
        ApprovalResponse, AvailabilityQuery, AvailabilityResponse, CreateReservationRequest,
        OccupancyQuery, OccupancyResponse, RejectReservationRequest, ReservationListQuery,
        ReservationResponse, ReservationsResponse,
    },
};

fn ensure_admin(user: &AuthorizedUser) -> AppResult<()> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "this operation requires an administrator role".into(),
        ));
    }
    Ok(())
}

/// The submission path refuses deactivated and maintenance spaces, so the
/// advisory availability check must refuse them too instead of reporting a
/// bookable slot the submit would reject.
fn ensure_bookable(space: &Space) -> AppResult<()> {
    if !space.is_visible() {
        return Err(AppError::UnprocessableEntity(format!(
            "space ({}) is not open for booking",
            space.id
        )));
    }
    Ok(())
}

/// Emission honors the policy's notification switch but never fails the
/// transition it reports on; a lost notice is logged and forgotten.
async fn emit_notice(registry: &AppRegistry, notice: TransitionNotice) {
    match registry.policy_repository().get().await {
        Ok(policy) if !policy.notifications_enabled => {
            tracing::debug!(
                reservation_id = %notice.reservation_id,
                "notifications disabled by policy; notice suppressed"
            );
        }
        Ok(_) => registry.notification_gateway().publish(notice).await,
        Err(e) => {
            tracing::warn!(error = %e, "could not read notification policy; emitting anyway");
            registry.notification_gateway().publish(notice).await;
        }
    }
}

pub async fn submit_reservation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    let window = TimeWindow::new(req.start_time, req.end_time)?;
    let event = CreateReservation::new(
        req.space_id,
        user.id(),
        window,
        req.event_type,
        req.expected_attendance,
        req.document_refs,
    );

    let reservation = registry.reservation_repository().create(event).await?;

    emit_notice(
        &registry,
        TransitionNotice::submitted(reservation.id, Actor::User(user.id())),
    )
    .await;

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

pub async fn approve_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ApprovalResponse>> {
    ensure_admin(&user)?;

    let event = ApproveReservation::new(reservation_id, user.id());
    let outcome = registry.reservation_repository().approve(event).await?;

    if outcome.changed {
        emit_notice(
            &registry,
            TransitionNotice::transitioned(
                outcome.approved.id,
                ReservationState::Pending,
                ReservationState::Approved,
                Actor::Admin(user.id()),
                None,
            ),
        )
        .await;

        for displaced in &outcome.displaced {
            emit_notice(
                &registry,
                TransitionNotice::transitioned(
                    displaced.id,
                    ReservationState::Pending,
                    ReservationState::Rejected,
                    Actor::System,
                    displaced.rejection_reason.clone(),
                ),
            )
            .await;
        }
    }

    Ok(Json(ApprovalResponse {
        reservation: outcome.approved.into(),
        displaced: outcome
            .displaced
            .into_iter()
            .map(ReservationResponse::from)
            .collect(),
    }))
}

pub async fn reject_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<RejectReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    ensure_admin(&user)?;
    req.validate(&())?;

    let event = RejectReservation::new(reservation_id, user.id(), req.reason.clone());
    let outcome = registry.reservation_repository().reject(event).await?;

    if outcome.changed {
        emit_notice(
            &registry,
            TransitionNotice::transitioned(
                outcome.reservation.id,
                ReservationState::Pending,
                ReservationState::Rejected,
                Actor::Admin(user.id()),
                Some(req.reason),
            ),
        )
        .await;
    }

    Ok(Json(outcome.reservation.into()))
}

pub async fn cancel_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    let event = CancelReservation::new(reservation_id, user.id(), user.role());
    let outcome = registry.reservation_repository().cancel(event).await?;

    if outcome.changed {
        emit_notice(
            &registry,
            TransitionNotice::transitioned(
                outcome.reservation.id,
                ReservationState::Pending,
                ReservationState::Cancelled,
                Actor::User(user.id()),
                None,
            ),
        )
        .await;
    }

    Ok(Json(outcome.reservation.into()))
}

pub async fn show_reservation(
    _user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await
        .and_then(|reservation| match reservation {
            Some(r) => Ok(Json(r.into())),
            None => Err(AppError::EntityNotFound(
                "specified reservation not found".into(),
            )),
        })
}

pub async fn show_my_reservations(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_by_requester(user.id())
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_reservations_by_state(
    user: AuthorizedUser,
    Query(query): Query<ReservationListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    ensure_admin(&user)?;

    registry
        .reservation_repository()
        .find_by_state(query.state)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

/// Interactive availability check. Advisory only: the authoritative check
/// re-runs inside the submission's critical section, since time passes
/// between this call and the actual submit.
pub async fn check_availability(
    _user: AuthorizedUser,
    Path(space_id): Path<SpaceId>,
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityResponse>> {
    let window = TimeWindow::new(query.start, query.end)?;

    let space = registry
        .space_repository()
        .find_by_id(space_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("specified space not found".into()))?;
    ensure_bookable(&space)?;

    let policy = registry.policy_repository().get().await?;

    let draft = ReservationDraft {
        window,
        expected_attendance: query.attendance,
    };
    let violations = policy::evaluate(&draft, &space, &policy, Utc::now());

    let conflicts = registry
        .reservation_repository()
        .find_overlapping(space_id, window)
        .await?;

    Ok(Json(AvailabilityResponse::new(conflicts, violations)))
}

pub async fn show_occupancy(
    _user: AuthorizedUser,
    Path(space_id): Path<SpaceId>,
    Query(query): Query<OccupancyQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<OccupancyResponse>> {
    let range = TimeWindow::new(query.from, query.to)?;

    // A grid for an unknown space would be indistinguishable from a fully
    // free one, so the space is resolved first.
    registry
        .space_repository()
        .find_by_id(space_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("specified space not found".into()))?;

    let reservations = registry
        .reservation_repository()
        .find_in_range(space_id, range)
        .await?;

    let grid = occupancy_grid(&reservations, range, Duration::minutes(query.slot_minutes))?;

    Ok(Json(grid.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::{id::SpaceId, space::SpaceStatus};

    fn space(status: SpaceStatus, is_active: bool) -> Space {
        Space {
            id: SpaceId::new(),
            name: "Sala Magna".into(),
            location: "Edificio B".into(),
            capacity: 50,
            equipment: vec![],
            opens_at: None,
            closes_at: None,
            status,
            is_active,
        }
    }

    #[test]
    fn a_maintenance_space_is_not_bookable() {
        let result = ensure_bookable(&space(SpaceStatus::Maintenance, true));
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[test]
    fn a_deactivated_space_is_not_bookable() {
        let result = ensure_bookable(&space(SpaceStatus::Available, false));
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[test]
    fn an_active_available_space_is_bookable() {
        assert!(ensure_bookable(&space(SpaceStatus::Available, true)).is_ok());
    }
}

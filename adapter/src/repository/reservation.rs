use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;

use kernel::model::id::{ReservationId, SpaceId, UserId};
use kernel::model::interval::TimeWindow;
use kernel::model::policy::{self, ReservationDraft};
use kernel::model::reservation::{
    event::{ApproveReservation, CancelReservation, CreateReservation, RejectReservation},
    Reservation, ReservationState, Transition, TransitionCommand,
};
use kernel::model::space::{Space, SpaceStatus};
use kernel::repository::reservation::{ApprovalOutcome, ReservationRepository, TransitionOutcome};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::policy::PolicyRow,
    model::reservation::{rows_into_reservations, ReservationRow},
    model::space::SpaceRow,
    ConnectionPool,
};

const RESERVATION_COLUMNS: &str = "reservation_id, space_id, requested_by, start_at, end_at, \
     event_type, expected_attendance, state, rejection_reason, document_refs, created_at";

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // The availability pre-check the client ran is advisory only; the
        // authoritative check happens here, under the per-space lock, in
        // the same transaction as the insert.
        self.acquire_space_lock(&mut tx, event.space_id).await?;

        let space = self.fetch_space(&mut tx, event.space_id).await?;
        if !space.is_active {
            return Err(AppError::UnprocessableEntity(format!(
                "space ({}) is deactivated and cannot be booked",
                event.space_id
            )));
        }
        if space.status == SpaceStatus::Maintenance {
            return Err(AppError::UnprocessableEntity(format!(
                "space ({}) is under maintenance",
                event.space_id
            )));
        }

        let policy = self.fetch_policy(&mut tx).await?;
        let draft = ReservationDraft {
            window: event.window,
            expected_attendance: Some(event.expected_attendance),
        };
        let violations = policy::evaluate(&draft, &space, &policy, Utc::now());
        if !violations.is_empty() {
            return Err(AppError::PolicyViolation(
                violations.iter().map(ToString::to_string).collect(),
            ));
        }

        let conflicts = self
            .fetch_blocking_in_window(&mut tx, event.space_id, event.window)
            .await?;
        if !conflicts.is_empty() {
            return Err(AppError::ReservationConflict(
                conflicts.iter().map(Reservation::conflict_entry).collect(),
            ));
        }

        let reservation_id = ReservationId::new();
        let row: ReservationRow = sqlx::query_as(&format!(
            r#"
                INSERT INTO reservations
                (reservation_id, space_id, requested_by, start_at, end_at,
                 event_type, expected_attendance, state, document_refs)
                VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8)
                RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(reservation_id)
        .bind(event.space_id)
        .bind(event.requested_by)
        .bind(event.window.start())
        .bind(event.window.end())
        .bind(event.event_type)
        .bind(event.expected_attendance)
        .bind(&event.document_refs)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        row.try_into()
    }

    async fn approve(&self, event: ApproveReservation) -> AppResult<ApprovalOutcome> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // Locate the space first so the advisory lock is taken before the
        // row is inspected; approvals and submissions for the same space
        // then never interleave.
        let space_id = self.fetch_space_id(&mut tx, event.reservation_id).await?;
        self.acquire_space_lock(&mut tx, space_id).await?;

        let reservation = self
            .fetch_for_update(&mut tx, event.reservation_id)
            .await?;

        match reservation.state.apply(&TransitionCommand::Approve)? {
            Transition::AlreadyApplied => {
                return Ok(ApprovalOutcome {
                    approved: reservation,
                    displaced: Vec::new(),
                    changed: false,
                })
            }
            Transition::Changed(_) => {}
        }

        let approved_row: ReservationRow = sqlx::query_as(&format!(
            r#"
                UPDATE reservations
                SET state = 'approved'
                WHERE reservation_id = $1
                RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(event.reservation_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        let approved: Reservation = approved_row.try_into()?;

        // Conflict resolution on approval: every still-pending reservation
        // whose window overlaps the newly approved one loses the race, in
        // the same transaction. This is what keeps "no two approved
        // reservations overlap" an invariant rather than a hope.
        let displaced_rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            r#"
                UPDATE reservations
                SET state = 'rejected', rejection_reason = $4
                WHERE space_id = $1
                  AND state = 'pending'
                  AND reservation_id <> $2
                  AND start_at < $5
                  AND $3 < end_at
                RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(space_id)
        .bind(approved.id)
        .bind(approved.window.start())
        .bind(format!(
            "The time slot was assigned to reservation {}",
            approved.id
        ))
        .bind(approved.window.end())
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(ApprovalOutcome {
            approved,
            displaced: rows_into_reservations(displaced_rows)?,
            changed: true,
        })
    }

    async fn reject(&self, event: RejectReservation) -> AppResult<TransitionOutcome> {
        let mut tx = self.db.begin().await?;

        let reservation = self
            .fetch_for_update(&mut tx, event.reservation_id)
            .await?;

        let command = TransitionCommand::Reject {
            reason: &event.reason,
        };
        match reservation.state.apply(&command)? {
            Transition::AlreadyApplied => {
                return Ok(TransitionOutcome {
                    reservation,
                    changed: false,
                })
            }
            Transition::Changed(_) => {}
        }

        let row: ReservationRow = sqlx::query_as(&format!(
            r#"
                UPDATE reservations
                SET state = 'rejected', rejection_reason = $2
                WHERE reservation_id = $1
                RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(event.reservation_id)
        .bind(&event.reason)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(TransitionOutcome {
            reservation: row.try_into()?,
            changed: true,
        })
    }

    async fn cancel(&self, event: CancelReservation) -> AppResult<TransitionOutcome> {
        let mut tx = self.db.begin().await?;

        let reservation = self
            .fetch_for_update(&mut tx, event.reservation_id)
            .await?;

        if reservation.requested_by != event.requested_by && !event.requested_as.is_admin() {
            return Err(AppError::Forbidden(
                "only the requester may cancel this reservation".into(),
            ));
        }

        match reservation.state.apply(&TransitionCommand::Cancel)? {
            Transition::AlreadyApplied => {
                return Ok(TransitionOutcome {
                    reservation,
                    changed: false,
                })
            }
            Transition::Changed(_) => {}
        }

        let row: ReservationRow = sqlx::query_as(&format!(
            r#"
                UPDATE reservations
                SET state = 'cancelled'
                WHERE reservation_id = $1
                RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(event.reservation_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(TransitionOutcome {
            reservation: row.try_into()?,
            changed: true,
        })
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE reservation_id = $1
            "#
        ))
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Reservation::try_from).transpose()
    }

    async fn find_overlapping(
        &self,
        space_id: SpaceId,
        window: TimeWindow,
    ) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE space_id = $1
                  AND state IN ('pending', 'approved')
                  AND start_at < $3
                  AND $2 < end_at
                ORDER BY start_at ASC
            "#
        ))
        .bind(space_id)
        .bind(window.start())
        .bind(window.end())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows_into_reservations(rows)
    }

    async fn find_in_range(
        &self,
        space_id: SpaceId,
        range: TimeWindow,
    ) -> AppResult<Vec<Reservation>> {
        self.find_overlapping(space_id, range).await
    }

    async fn find_by_requester(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE requested_by = $1
                ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows_into_reservations(rows)
    }

    async fn find_by_state(&self, state: ReservationState) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE state = $1
                ORDER BY created_at ASC
            "#
        ))
        .bind(state)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows_into_reservations(rows)
    }
}

impl ReservationRepositoryImpl {
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    // Transaction-scoped exclusive lock keyed on the space id. Check and
    // insert (or approve and displace) for one space happen under this
    // lock, which closes the time-of-check/time-of-use window between the
    // interactive pre-check and the final submission.
    async fn acquire_space_lock(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        space_id: SpaceId,
    ) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(space_id)
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn fetch_space(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        space_id: SpaceId,
    ) -> AppResult<Space> {
        let row: Option<SpaceRow> = sqlx::query_as(
            r#"
                SELECT space_id, name, location, capacity, equipment,
                       opens_at, closes_at, status, is_active
                FROM spaces
                WHERE space_id = $1
            "#,
        )
        .bind(space_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Space::from)
            .ok_or_else(|| AppError::EntityNotFound(format!("space ({space_id}) was not found")))
    }

    async fn fetch_policy(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<kernel::model::policy::Policy> {
        let row: PolicyRow = sqlx::query_as(
            r#"
                SELECT version, min_lead_time_days, max_duration_hours,
                       default_opens_at, default_closes_at,
                       allow_weekend_bookings, academic_priority,
                       reminder_lead_days, notifications_enabled, updated_at
                FROM system_policy
                WHERE id = 1
            "#,
        )
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.into())
    }

    async fn fetch_space_id(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        reservation_id: ReservationId,
    ) -> AppResult<SpaceId> {
        let space_id: Option<(SpaceId,)> =
            sqlx::query_as("SELECT space_id FROM reservations WHERE reservation_id = $1")
                .bind(reservation_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

        space_id.map(|(id,)| id).ok_or_else(|| {
            AppError::EntityNotFound(format!("reservation ({reservation_id}) was not found"))
        })
    }

    async fn fetch_for_update(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        reservation_id: ReservationId,
    ) -> AppResult<Reservation> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE reservation_id = $1
                FOR UPDATE
            "#
        ))
        .bind(reservation_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.ok_or_else(|| {
            AppError::EntityNotFound(format!("reservation ({reservation_id}) was not found"))
        })?
        .try_into()
    }

    async fn fetch_blocking_in_window(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        space_id: SpaceId,
        window: TimeWindow,
    ) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE space_id = $1
                  AND state IN ('pending', 'approved')
                  AND start_at < $3
                  AND $2 < end_at
                ORDER BY start_at ASC
            "#
        ))
        .bind(space_id)
        .bind(window.start())
        .bind(window.end())
        .fetch_all(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows_into_reservations(rows)
    }
}

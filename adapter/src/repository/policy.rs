use async_trait::async_trait;
use derive_new::new;

use kernel::model::policy::{event::UpdatePolicy, Policy};
use kernel::repository::policy::PolicyRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::policy::PolicyRow, ConnectionPool};

const POLICY_COLUMNS: &str = "version, min_lead_time_days, max_duration_hours, \
     default_opens_at, default_closes_at, allow_weekend_bookings, \
     academic_priority, reminder_lead_days, notifications_enabled, updated_at";

#[derive(new)]
pub struct PolicyRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl PolicyRepository for PolicyRepositoryImpl {
    async fn get(&self) -> AppResult<Policy> {
        let row: PolicyRow = sqlx::query_as(&format!(
            r#"
                SELECT {POLICY_COLUMNS}
                FROM system_policy
                WHERE id = 1
            "#
        ))
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.into())
    }

    async fn update(&self, event: UpdatePolicy) -> AppResult<Policy> {
        if matches!(event.min_lead_time_days, Some(d) if d < 0)
            || matches!(event.reminder_lead_days, Some(d) if d < 0)
        {
            return Err(AppError::UnprocessableEntity(
                "lead times must not be negative".into(),
            ));
        }
        if matches!(event.max_duration_hours, Some(h) if h < 1) {
            return Err(AppError::UnprocessableEntity(
                "maximum duration must be at least one hour".into(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let row: PolicyRow = sqlx::query_as(&format!(
            r#"
                UPDATE system_policy
                SET min_lead_time_days = COALESCE($1, min_lead_time_days),
                    max_duration_hours = COALESCE($2, max_duration_hours),
                    default_opens_at = COALESCE($3, default_opens_at),
                    default_closes_at = COALESCE($4, default_closes_at),
                    allow_weekend_bookings = COALESCE($5, allow_weekend_bookings),
                    academic_priority = COALESCE($6, academic_priority),
                    reminder_lead_days = COALESCE($7, reminder_lead_days),
                    notifications_enabled = COALESCE($8, notifications_enabled),
                    version = version + 1,
                    updated_at = NOW()
                WHERE id = 1
                RETURNING {POLICY_COLUMNS}
            "#
        ))
        .bind(event.min_lead_time_days)
        .bind(event.max_duration_hours)
        .bind(event.default_opens_at)
        .bind(event.default_closes_at)
        .bind(event.allow_weekend_bookings)
        .bind(event.academic_priority)
        .bind(event.reminder_lead_days)
        .bind(event.notifications_enabled)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let policy: Policy = row.into();

        if policy.default_opens_at >= policy.default_closes_at {
            return Err(AppError::UnprocessableEntity(
                "default opening time must be before the closing time".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(policy)
    }
}

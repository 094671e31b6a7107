use async_trait::async_trait;
use derive_new::new;

use kernel::model::id::SpaceId;
use kernel::model::space::{
    event::{CreateSpace, DeactivateSpace, UpdateSpace},
    Space,
};
use kernel::repository::space::SpaceRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::space::SpaceRow, ConnectionPool};

const SPACE_COLUMNS: &str =
    "space_id, name, location, capacity, equipment, opens_at, closes_at, status, is_active";

#[derive(new)]
pub struct SpaceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SpaceRepository for SpaceRepositoryImpl {
    async fn create(&self, event: CreateSpace) -> AppResult<Space> {
        if event.capacity < 1 {
            return Err(AppError::UnprocessableEntity(
                "space capacity must be positive".into(),
            ));
        }
        if let (Some(opens_at), Some(closes_at)) = (event.opens_at, event.closes_at) {
            if opens_at >= closes_at {
                return Err(AppError::UnprocessableEntity(
                    "opening time must be before closing time".into(),
                ));
            }
        }

        let row: SpaceRow = sqlx::query_as(&format!(
            r#"
                INSERT INTO spaces
                (space_id, name, location, capacity, equipment, opens_at, closes_at, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING {SPACE_COLUMNS}
            "#
        ))
        .bind(SpaceId::new())
        .bind(&event.name)
        .bind(&event.location)
        .bind(event.capacity)
        .bind(&event.equipment)
        .bind(event.opens_at)
        .bind(event.closes_at)
        .bind(event.status)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.into())
    }

    async fn update(&self, event: UpdateSpace) -> AppResult<Space> {
        if matches!(event.capacity, Some(c) if c < 1) {
            return Err(AppError::UnprocessableEntity(
                "space capacity must be positive".into(),
            ));
        }

        // The new hours may combine a stored value with an updated one, so
        // the invariant is checked on the merged row before committing.
        let mut tx = self.db.begin().await?;

        let row: Option<SpaceRow> = sqlx::query_as(&format!(
            r#"
                UPDATE spaces
                SET name = COALESCE($2, name),
                    location = COALESCE($3, location),
                    capacity = COALESCE($4, capacity),
                    equipment = COALESCE($5, equipment),
                    opens_at = COALESCE($6, opens_at),
                    closes_at = COALESCE($7, closes_at),
                    status = COALESCE($8, status)
                WHERE space_id = $1
                RETURNING {SPACE_COLUMNS}
            "#
        ))
        .bind(event.space_id)
        .bind(event.name)
        .bind(event.location)
        .bind(event.capacity)
        .bind(event.equipment)
        .bind(event.opens_at)
        .bind(event.closes_at)
        .bind(event.status)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let space: Space = row
            .map(Space::from)
            .ok_or_else(|| AppError::EntityNotFound("specified space not found".into()))?;

        if let (Some(opens_at), Some(closes_at)) = (space.opens_at, space.closes_at) {
            if opens_at >= closes_at {
                return Err(AppError::UnprocessableEntity(
                    "opening time must be before closing time".into(),
                ));
            }
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(space)
    }

    async fn deactivate(&self, event: DeactivateSpace) -> AppResult<()> {
        let res = sqlx::query("UPDATE spaces SET is_active = FALSE WHERE space_id = $1")
            .bind(event.space_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified space not found".into()));
        }

        Ok(())
    }

    async fn find_by_id(&self, space_id: SpaceId) -> AppResult<Option<Space>> {
        let row: Option<SpaceRow> = sqlx::query_as(&format!(
            r#"
                SELECT {SPACE_COLUMNS}
                FROM spaces
                WHERE space_id = $1
            "#
        ))
        .bind(space_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Space::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Space>> {
        let rows: Vec<SpaceRow> = sqlx::query_as(&format!(
            r#"
                SELECT {SPACE_COLUMNS}
                FROM spaces
                ORDER BY name ASC
            "#
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Space::from).collect())
    }

    // SQL rendering of `Space::is_visible`, kept in sync with the kernel
    // predicate so the filter runs on the database side.
    async fn find_visible(&self) -> AppResult<Vec<Space>> {
        let rows: Vec<SpaceRow> = sqlx::query_as(&format!(
            r#"
                SELECT {SPACE_COLUMNS}
                FROM spaces
                WHERE is_active = TRUE AND status <> 'maintenance'
                ORDER BY name ASC
            "#
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Space::from).collect())
    }
}

use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::id::SpaceId;
use crate::model::space::{
    event::{CreateSpace, DeactivateSpace, UpdateSpace},
    Space,
};

#[async_trait]
pub trait SpaceRepository: Send + Sync {
    async fn create(&self, event: CreateSpace) -> AppResult<Space>;
    async fn update(&self, event: UpdateSpace) -> AppResult<Space>;
    /// Removes the space from booking-eligible listings without touching
    /// the reservations that reference it.
    async fn deactivate(&self, event: DeactivateSpace) -> AppResult<()>;
    async fn find_by_id(&self, space_id: SpaceId) -> AppResult<Option<Space>>;
    async fn find_all(&self) -> AppResult<Vec<Space>>;
    async fn find_visible(&self) -> AppResult<Vec<Space>>;
}

use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::policy::{event::UpdatePolicy, Policy};

#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// Returns the current policy snapshot. The singleton row is seeded by
    /// the migrations, so this never falls back to hard-coded defaults.
    async fn get(&self) -> AppResult<Policy>;
    /// Last-writer-wins update; bumps the stored version.
    async fn update(&self, event: UpdatePolicy) -> AppResult<Policy>;
}

use async_trait::async_trait;

use crate::model::notification::TransitionNotice;

/// Boundary to the external notification collaborator.
///
/// Emission is fire-and-forget: implementations log delivery failures and
/// never surface them, since a lost notification must not roll back the
/// state transition that produced it.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn publish(&self, notice: TransitionNotice);
}

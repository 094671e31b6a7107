use axum::{extract::State, Json};
use garde::Validate;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::policy::{PolicyResponse, UpdatePolicyRequest},
};

fn ensure_admin(user: &AuthorizedUser) -> AppResult<()> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "this operation requires an administrator role".into(),
        ));
    }
    Ok(())
}

pub async fn show_policy(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PolicyResponse>> {
    ensure_admin(&user)?;

    registry
        .policy_repository()
        .get()
        .await
        .map(PolicyResponse::from)
        .map(Json)
}

pub async fn update_policy(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdatePolicyRequest>,
) -> AppResult<Json<PolicyResponse>> {
    ensure_admin(&user)?;
    req.validate(&())?;

    registry
        .policy_repository()
        .update(req.into_event(user.id()))
        .await
        .map(PolicyResponse::from)
        .map(Json)
}

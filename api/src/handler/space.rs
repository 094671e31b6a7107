use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{id::SpaceId, space::event::DeactivateSpace};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::space::{
        CreateSpaceRequest, SpaceResponse, SpacesResponse, UpdateSpaceRequest,
        UpdateSpaceRequestWithIds,
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

pub async fn register_space(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateSpaceRequest>,
) -> AppResult<(StatusCode, Json<SpaceResponse>)> {
    ensure_admin(&user)?;
    req.validate(&())?;

    registry
        .space_repository()
        .create(req.into())
        .await
        .map(SpaceResponse::from)
        .map(|space| (StatusCode::CREATED, Json(space)))
}

pub async fn show_space_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SpacesResponse>> {
    ensure_admin(&user)?;

    registry
        .space_repository()
        .find_all()
        .await
        .map(SpacesResponse::from)
        .map(Json)
}

pub async fn show_visible_spaces(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SpacesResponse>> {
    registry
        .space_repository()
        .find_visible()
        .await
        .map(SpacesResponse::from)
        .map(Json)
}

pub async fn show_space(
    _user: AuthorizedUser,
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SpaceResponse>> {
    registry
        .space_repository()
        .find_by_id(space_id)
        .await
        .and_then(|space| match space {
            Some(space) => Ok(Json(space.into())),
            None => Err(AppError::EntityNotFound("specified space not found".into())),
        })
}

pub async fn update_space(
    user: AuthorizedUser,
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateSpaceRequest>,
) -> AppResult<Json<SpaceResponse>> {
    ensure_admin(&user)?;
    req.validate(&())?;

    let update_space = UpdateSpaceRequestWithIds::new(space_id, user.id(), req);
    registry
        .space_repository()
        .update(update_space.into())
        .await
        .map(SpaceResponse::from)
        .map(Json)
}

pub async fn deactivate_space(
    user: AuthorizedUser,
    Path(space_id): Path<SpaceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    ensure_admin(&user)?;

    let event = DeactivateSpace {
        space_id,
        requested_by: user.id(),
    };
    registry
        .space_repository()
        .deactivate(event)
        .await
        .map(|_| StatusCode::OK)
}

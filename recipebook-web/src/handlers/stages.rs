//! Stage and stage photo handlers
//!
//! Stages and photos have no owner of their own; access is decided on the
//! recipe they hang off.

use super::{
    load_recipe,
    types::{ErrorResponse, MessageResponse, StagePhotoResponse, StageRequest},
};
use crate::{auth::AuthUser, AppState, WebResult};
use axum::{
    extract::{Multipart, Path, State},
    response::Json,
    Json as JsonExtractor,
};
use recipebook_core::{ensure, not_found_error, validation_error, Action, Stage};

/// Live stage plus the update check on its recipe
async fn owned_stage(app_state: &AppState, user: &AuthUser, stage_id: i64) -> WebResult<Stage> {
    let stage = app_state
        .db
        .find_stage(stage_id)
        .await?
        .ok_or_else(|| not_found_error!("Stage", "stages"))?;

    let recipe = load_recipe(app_state, stage.recipe_id).await?;
    ensure(&user.context(), Action::Update, &recipe)?;
    Ok(stage)
}

#[utoipa::path(
    put,
    path = "/api/stages/{stage_id}",
    tag = "Stages",
    security(("bearer_auth" = [])),
    params(("stage_id" = i64, Path, description = "Stage id")),
    request_body = StageRequest,
    responses(
        (status = 200, description = "Stage updated", body = MessageResponse),
        (status = 400, description = "Empty description", body = ErrorResponse),
        (status = 403, description = "Not the recipe owner", body = ErrorResponse),
        (status = 404, description = "No such stage", body = ErrorResponse)
    )
)]
pub async fn update_stage(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(stage_id): Path<i64>,
    JsonExtractor(request): JsonExtractor<StageRequest>,
) -> WebResult<Json<MessageResponse>> {
    let stage = owned_stage(&app_state, &user, stage_id).await?;

    let description = request.description.trim();
    if description.is_empty() {
        return Err(
            validation_error!("Stage description is required", "description", "stages").into(),
        );
    }

    app_state.db.update_stage(stage.id, description).await?;
    Ok(Json(MessageResponse::new("Stage updated")))
}

/// Delete a stage and its photos
#[utoipa::path(
    delete,
    path = "/api/stages/{stage_id}",
    tag = "Stages",
    security(("bearer_auth" = [])),
    params(("stage_id" = i64, Path, description = "Stage id")),
    responses(
        (status = 200, description = "Stage deleted", body = MessageResponse),
        (status = 403, description = "Not the recipe owner", body = ErrorResponse),
        (status = 404, description = "No such stage", body = ErrorResponse)
    )
)]
pub async fn delete_stage(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(stage_id): Path<i64>,
) -> WebResult<Json<MessageResponse>> {
    let stage = owned_stage(&app_state, &user, stage_id).await?;
    app_state.db.soft_delete_stage(stage.id).await?;
    Ok(Json(MessageResponse::new("Stage deleted")))
}

/// Attach a photo to a stage (multipart field `file`)
#[utoipa::path(
    post,
    path = "/api/stages/{stage_id}/photos",
    tag = "Stages",
    security(("bearer_auth" = [])),
    params(("stage_id" = i64, Path, description = "Stage id")),
    request_body(content_type = "multipart/form-data", description = "Image in field `file`"),
    responses(
        (status = 200, description = "Photo stored", body = StagePhotoResponse),
        (status = 400, description = "Not a png, jpg or gif", body = ErrorResponse),
        (status = 403, description = "Not the recipe owner", body = ErrorResponse),
        (status = 404, description = "No such stage", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
pub async fn upload_stage_photo(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(stage_id): Path<i64>,
    multipart: Multipart,
) -> WebResult<Json<StagePhotoResponse>> {
    let stage = owned_stage(&app_state, &user, stage_id).await?;
    let photo = app_state.uploads.save_from_multipart(multipart).await?;
    let id = app_state.db.add_stage_photo(stage.id, &photo).await?;

    Ok(Json(StagePhotoResponse {
        message: "Photo added".to_string(),
        id,
        photo,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/photos/{photo_id}",
    tag = "Stages",
    security(("bearer_auth" = [])),
    params(("photo_id" = i64, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Photo deleted", body = MessageResponse),
        (status = 403, description = "Not the recipe owner", body = ErrorResponse),
        (status = 404, description = "No such photo", body = ErrorResponse)
    )
)]
pub async fn delete_photo(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(photo_id): Path<i64>,
) -> WebResult<Json<MessageResponse>> {
    let photo = app_state
        .db
        .find_photo(photo_id)
        .await?
        .ok_or_else(|| not_found_error!("Photo", "stages"))?;
    owned_stage(&app_state, &user, photo.stage_id).await?;

    app_state.db.soft_delete_photo(photo.id).await?;
    Ok(Json(MessageResponse::new("Photo deleted")))
}

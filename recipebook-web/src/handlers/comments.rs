//! Comment handlers
//!
//! Comments are readable whenever their recipe is. Writing one requires a
//! published recipe that belongs to somebody else.

use super::{
    load_recipe,
    types::{CommentRequest, CreatedResponse, ErrorResponse, MessageResponse},
};
use crate::{
    auth::{AuthUser, OptionalUser},
    AppState, WebResult,
};
use axum::{
    extract::{Path, State},
    response::Json,
    Json as JsonExtractor,
};
use recipebook_core::{
    authorize, ensure, not_found_error, validate_rating, validation_error, Action, Comment,
};
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/comments",
    tag = "Comments",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Comments, oldest first", body = [Comment]),
        (status = 404, description = "Missing or hidden recipe", body = ErrorResponse)
    )
)]
pub async fn list_comments(
    State(app_state): State<AppState>,
    caller: OptionalUser,
    Path(id): Path<i64>,
) -> WebResult<Json<Vec<Comment>>> {
    let recipe = load_recipe(&app_state, id).await?;
    ensure(&caller.context(), Action::Read, &recipe)?;
    Ok(Json(app_state.db.list_comments(recipe.id).await?))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/comments/{comment_id}",
    tag = "Comments",
    params(
        ("id" = i64, Path, description = "Recipe id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment", body = Comment),
        (status = 404, description = "Missing comment or unreadable recipe", body = ErrorResponse)
    )
)]
pub async fn get_comment(
    State(app_state): State<AppState>,
    caller: OptionalUser,
    Path((id, comment_id)): Path<(i64, i64)>,
) -> WebResult<Json<Comment>> {
    let recipe = load_recipe(&app_state, id).await?;
    ensure(&caller.context(), Action::Read, &recipe)?;

    let comment = app_state
        .db
        .find_comment(recipe.id, comment_id)
        .await?
        .ok_or_else(|| not_found_error!("Comment", "comments"))?;
    Ok(Json(comment))
}

/// Comment on and rate someone else's published recipe
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/comments",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment added", body = CreatedResponse),
        (status = 400, description = "Empty text or rating outside 0-5", body = ErrorResponse),
        (status = 403, description = "Own recipe", body = ErrorResponse),
        (status = 404, description = "Missing or hidden recipe", body = ErrorResponse)
    )
)]
pub async fn create_comment(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    JsonExtractor(request): JsonExtractor<CommentRequest>,
) -> WebResult<Json<CreatedResponse>> {
    let recipe = load_recipe(&app_state, id).await?;
    ensure(&user.context(), Action::Comment, &recipe)?;

    let text = request.text.trim();
    if text.is_empty() {
        return Err(validation_error!("Comment text is required", "text", "comments").into());
    }
    validate_rating(request.rate)?;

    let comment_id = app_state
        .db
        .create_comment(recipe.id, user.id(), text, request.rate)
        .await?;
    info!(
        user_id = user.id(),
        recipe_id = recipe.id,
        comment_id,
        "Comment added"
    );
    Ok(Json(CreatedResponse::new("Comment added", comment_id)))
}

/// Delete the caller's own comment; anyone else's reads as missing
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/comments/{comment_id}",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Recipe id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 404, description = "No such comment of the caller", body = ErrorResponse)
    )
)]
pub async fn delete_comment(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path((id, comment_id)): Path<(i64, i64)>,
) -> WebResult<Json<MessageResponse>> {
    // Authors keep control of their comments after the recipe is hidden
    let recipe = load_recipe(&app_state, id).await?;

    let comment = app_state
        .db
        .find_comment(recipe.id, comment_id)
        .await?
        .filter(|comment| authorize(&user.context(), Action::Delete, comment).is_allowed())
        .ok_or_else(|| not_found_error!("Comment", "comments"))?;

    app_state.db.soft_delete_comment(comment.id).await?;
    Ok(Json(MessageResponse::new("Comment deleted")))
}

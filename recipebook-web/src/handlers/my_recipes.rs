//! Owner-side recipe handlers
//!
//! Every route here mutates or reads a recipe through its owner, so each one
//! loads the recipe and runs the ownership check before doing anything else.

use super::{
    load_recipe,
    types::{
        AddIngredientRequest, CoverResponse, CreatedResponse, ErrorResponse, MessageResponse,
        StageRequest, VisibilityRequest,
    },
};
use crate::{auth::AuthUser, AppState, WebResult};
use axum::{
    extract::{Multipart, Path, State},
    response::Json,
    Json as JsonExtractor,
};
use recipebook_core::{
    ensure, not_found_error, validation_error, Action, Recipe, RecipeDetails, RecipeFields,
};
use tracing::info;

/// Load a recipe the caller owns: 404 when missing, 403 when not theirs
async fn owned_recipe(app_state: &AppState, user: &AuthUser, id: i64) -> WebResult<Recipe> {
    let recipe = load_recipe(app_state, id).await?;
    ensure(&user.context(), Action::Update, &recipe)?;
    Ok(recipe)
}

/// Create an empty, hidden recipe
#[utoipa::path(
    post,
    path = "/api/my-recipes",
    tag = "My recipes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Recipe created", body = CreatedResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(app_state): State<AppState>,
    user: AuthUser,
) -> WebResult<Json<CreatedResponse>> {
    let id = app_state.db.create_recipe(user.id()).await?;
    info!(user_id = user.id(), recipe_id = id, "Recipe created");
    Ok(Json(CreatedResponse::new("Recipe created", id)))
}

/// All of the caller's recipes, hidden ones included
#[utoipa::path(
    get,
    path = "/api/my-recipes",
    tag = "My recipes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's recipes", body = [Recipe])
    )
)]
pub async fn list_my_recipes(
    State(app_state): State<AppState>,
    user: AuthUser,
) -> WebResult<Json<Vec<Recipe>>> {
    Ok(Json(app_state.db.list_user_recipes(user.id()).await?))
}

#[utoipa::path(
    get,
    path = "/api/my-recipes/{id}",
    tag = "My recipes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe details", body = RecipeDetails),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "No such recipe", body = ErrorResponse)
    )
)]
pub async fn get_my_recipe(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> WebResult<Json<RecipeDetails>> {
    let recipe = owned_recipe(&app_state, &user, id).await?;
    Ok(Json(app_state.db.recipe_details(recipe).await?))
}

#[utoipa::path(
    put,
    path = "/api/my-recipes/{id}",
    tag = "My recipes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeFields,
    responses(
        (status = 200, description = "Recipe updated", body = MessageResponse),
        (status = 400, description = "Empty name", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "No such recipe", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    JsonExtractor(mut fields): JsonExtractor<RecipeFields>,
) -> WebResult<Json<MessageResponse>> {
    let recipe = owned_recipe(&app_state, &user, id).await?;

    fields.name = fields.name.trim().to_string();
    if fields.name.is_empty() {
        return Err(validation_error!("Recipe name is required", "name", "recipes").into());
    }
    if fields.servings < 0 || fields.time < 0 {
        return Err(
            validation_error!("Servings and time cannot be negative", "recipes").into(),
        );
    }

    app_state.db.update_recipe(recipe.id, &fields).await?;
    Ok(Json(MessageResponse::new("Recipe updated")))
}

/// Publish or hide a recipe
#[utoipa::path(
    put,
    path = "/api/my-recipes/{id}/visibility",
    tag = "My recipes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = VisibilityRequest,
    responses(
        (status = 200, description = "Visibility changed", body = MessageResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "No such recipe", body = ErrorResponse)
    )
)]
pub async fn set_visibility(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    JsonExtractor(request): JsonExtractor<VisibilityRequest>,
) -> WebResult<Json<MessageResponse>> {
    let recipe = owned_recipe(&app_state, &user, id).await?;
    app_state
        .db
        .set_recipe_visibility(recipe.id, request.visible)
        .await?;

    let message = if request.visible {
        "Recipe published"
    } else {
        "Recipe hidden"
    };
    Ok(Json(MessageResponse::new(message)))
}

#[utoipa::path(
    delete,
    path = "/api/my-recipes/{id}",
    tag = "My recipes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe deleted", body = MessageResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "No such recipe", body = ErrorResponse)
    )
)]
pub async fn delete_recipe(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> WebResult<Json<MessageResponse>> {
    let recipe = load_recipe(&app_state, id).await?;
    ensure(&user.context(), Action::Delete, &recipe)?;

    app_state.db.soft_delete_recipe(recipe.id).await?;
    info!(user_id = user.id(), recipe_id = id, "Recipe deleted");
    Ok(Json(MessageResponse::new("Recipe deleted")))
}

/// Upload a cover image (multipart field `file`)
#[utoipa::path(
    post,
    path = "/api/my-recipes/{id}/cover",
    tag = "My recipes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Recipe id")),
    request_body(content_type = "multipart/form-data", description = "Image in field `file`"),
    responses(
        (status = 200, description = "Cover stored", body = CoverResponse),
        (status = 400, description = "Not a png, jpg or gif", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
pub async fn upload_cover(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> WebResult<Json<CoverResponse>> {
    let recipe = owned_recipe(&app_state, &user, id).await?;
    let cover = app_state.uploads.save_from_multipart(multipart).await?;
    app_state.db.set_recipe_cover(recipe.id, &cover).await?;

    Ok(Json(CoverResponse {
        message: "Cover updated".to_string(),
        cover,
    }))
}

#[utoipa::path(
    post,
    path = "/api/my-recipes/{id}/stages",
    tag = "My recipes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = StageRequest,
    responses(
        (status = 200, description = "Stage added", body = CreatedResponse),
        (status = 400, description = "Empty description", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse)
    )
)]
pub async fn add_stage(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    JsonExtractor(request): JsonExtractor<StageRequest>,
) -> WebResult<Json<CreatedResponse>> {
    let recipe = owned_recipe(&app_state, &user, id).await?;

    let description = request.description.trim();
    if description.is_empty() {
        return Err(
            validation_error!("Stage description is required", "description", "stages").into(),
        );
    }

    let stage_id = app_state.db.create_stage(recipe.id, description).await?;
    Ok(Json(CreatedResponse::new("Stage added", stage_id)))
}

#[utoipa::path(
    post,
    path = "/api/my-recipes/{id}/ingredients",
    tag = "My recipes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = AddIngredientRequest,
    responses(
        (status = 200, description = "Ingredient added", body = CreatedResponse),
        (status = 400, description = "Quantity not positive", body = ErrorResponse),
        (status = 404, description = "No such recipe or ingredient", body = ErrorResponse),
        (status = 409, description = "Already in the recipe", body = ErrorResponse)
    )
)]
pub async fn add_recipe_ingredient(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    JsonExtractor(request): JsonExtractor<AddIngredientRequest>,
) -> WebResult<Json<CreatedResponse>> {
    let recipe = owned_recipe(&app_state, &user, id).await?;

    if !(request.quantity > 0.0) || !request.quantity.is_finite() {
        return Err(
            validation_error!("Quantity must be positive", "quantity", "ingredients").into(),
        );
    }

    let ingredient = app_state
        .db
        .find_ingredient(request.ingredient_id)
        .await?
        .ok_or_else(|| not_found_error!("Ingredient", "ingredients"))?;

    let link_id = app_state
        .db
        .add_recipe_ingredient(recipe.id, ingredient.id, request.quantity)
        .await?;
    Ok(Json(CreatedResponse::new("Ingredient added", link_id)))
}

#[utoipa::path(
    delete,
    path = "/api/my-recipes/{id}/ingredients/{ingredient_id}",
    tag = "My recipes",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Recipe id"),
        ("ingredient_id" = i64, Path, description = "Catalog ingredient id")
    ),
    responses(
        (status = 200, description = "Ingredient removed", body = MessageResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Ingredient not in the recipe", body = ErrorResponse)
    )
)]
pub async fn remove_recipe_ingredient(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path((id, ingredient_id)): Path<(i64, i64)>,
) -> WebResult<Json<MessageResponse>> {
    let recipe = owned_recipe(&app_state, &user, id).await?;

    if !app_state
        .db
        .remove_recipe_ingredient(recipe.id, ingredient_id)
        .await?
    {
        return Err(not_found_error!("Recipe ingredient", "ingredients").into());
    }
    Ok(Json(MessageResponse::new("Ingredient removed")))
}

//! Public recipe handlers: listing, search, details and favorites

use super::{
    load_recipe,
    types::{ErrorResponse, MessageResponse, PageQuery, SearchQuery},
};
use crate::{
    auth::{AuthUser, OptionalUser},
    db::Page,
    AppState, WebResult,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use recipebook_core::{ensure, validation_error, Action, Recipe, RecipeDetails};
use tracing::debug;

/// Published recipes, newest first
#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "Recipes",
    params(PageQuery),
    responses(
        (status = 200, description = "Published recipes", body = [Recipe])
    )
)]
pub async fn list_recipes(
    State(app_state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> WebResult<Json<Vec<Recipe>>> {
    let page = Page::from(query);
    Ok(Json(app_state.db.list_visible_recipes(page).await?))
}

/// Search published recipes by name
#[utoipa::path(
    get,
    path = "/api/recipes/search",
    tag = "Recipes",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching recipes", body = [Recipe]),
        (status = 400, description = "Empty search text", body = ErrorResponse)
    )
)]
pub async fn search_recipes(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> WebResult<Json<Vec<Recipe>>> {
    let text = query.text.trim();
    if text.is_empty() {
        return Err(validation_error!("Search text is required", "text", "recipes").into());
    }

    debug!("Searching recipes for {:?}", text);
    let page = Page::new(query.limit, query.offset);
    Ok(Json(app_state.db.search_visible_recipes(text, page).await?))
}

/// Recipe with stages, photos, ingredients and rating
#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "Recipes",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe details", body = RecipeDetails),
        (status = 404, description = "Missing or hidden", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(app_state): State<AppState>,
    caller: OptionalUser,
    Path(id): Path<i64>,
) -> WebResult<Json<RecipeDetails>> {
    let recipe = load_recipe(&app_state, id).await?;
    ensure(&caller.context(), Action::Read, &recipe)?;
    Ok(Json(app_state.db.recipe_details(recipe).await?))
}

/// Add a recipe to the caller's favorites
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    tag = "Recipes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "In favorites", body = MessageResponse),
        (status = 404, description = "Missing or hidden", body = ErrorResponse)
    )
)]
pub async fn add_favorite(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> WebResult<Json<MessageResponse>> {
    let recipe = load_recipe(&app_state, id).await?;
    ensure(&user.context(), Action::Favorite, &recipe)?;
    app_state.db.add_favorite(user.id(), recipe.id).await?;
    Ok(Json(MessageResponse::new("Added to favorites")))
}

/// Remove a recipe from the caller's favorites
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    tag = "Recipes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Not in favorites", body = MessageResponse),
        (status = 404, description = "Missing or hidden", body = ErrorResponse)
    )
)]
pub async fn remove_favorite(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> WebResult<Json<MessageResponse>> {
    let recipe = load_recipe(&app_state, id).await?;
    ensure(&user.context(), Action::Favorite, &recipe)?;
    app_state.db.remove_favorite(user.id(), recipe.id).await?;
    Ok(Json(MessageResponse::new("Removed from favorites")))
}

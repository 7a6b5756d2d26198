//! Shared ingredient catalog

use super::types::{CreatedResponse, ErrorResponse};
use crate::{auth::AuthUser, AppState, WebResult};
use axum::{extract::State, response::Json, Json as JsonExtractor};
use recipebook_core::{validation_error, Ingredient, NewIngredient};
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "Ingredients",
    responses(
        (status = 200, description = "Catalog sorted by name", body = [Ingredient])
    )
)]
pub async fn list_ingredients(
    State(app_state): State<AppState>,
) -> WebResult<Json<Vec<Ingredient>>> {
    Ok(Json(app_state.db.list_ingredients().await?))
}

/// Add an ingredient to the catalog; values are per 100 g
#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "Ingredients",
    security(("bearer_auth" = [])),
    request_body = NewIngredient,
    responses(
        (status = 200, description = "Ingredient created", body = CreatedResponse),
        (status = 400, description = "Empty name or negative value", body = ErrorResponse),
        (status = 409, description = "Name already in the catalog", body = ErrorResponse)
    )
)]
pub async fn create_ingredient(
    State(app_state): State<AppState>,
    user: AuthUser,
    JsonExtractor(new): JsonExtractor<NewIngredient>,
) -> WebResult<Json<CreatedResponse>> {
    if new.name.trim().is_empty() {
        return Err(validation_error!("Ingredient name is required", "name", "ingredients").into());
    }
    if new.has_negative_values() {
        return Err(
            validation_error!("Nutrition values cannot be negative", "ingredients").into(),
        );
    }

    let id = app_state.db.create_ingredient(&new).await?;
    info!(user_id = user.id(), ingredient_id = id, "Ingredient created: {}", new.name.trim());
    Ok(Json(CreatedResponse::new("Ingredient created", id)))
}

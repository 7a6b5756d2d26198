//! OpenAPI specification for the Recipe Book API

use axum::response::Json;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::auth::users::{SigninRequest, SignupRequest, UpdateProfileRequest};
use crate::handlers::{
    AddIngredientRequest, CommentRequest, CoverResponse, CreatedResponse, ErrorResponse,
    HealthResponse, MessageResponse, PhotoResponse, ProfileResponse, StagePhotoResponse,
    StageRequest, TokenResponse, VisibilityRequest,
};
use recipebook_core::{
    Comment, Ingredient, NewIngredient, Photo, PublicUser, Recipe, RecipeDetails, RecipeFields,
    RecipeIngredient, Stage, StageDetails,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recipe Book API",
        version = "0.1.0",
        description = "Share recipes with stages, photos, ingredients, comments and favorites",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:1337", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,

        // Accounts
        crate::auth::handlers::signup,
        crate::auth::handlers::signin,
        crate::auth::handlers::get_profile,
        crate::auth::handlers::update_profile,
        crate::auth::handlers::delete_profile,
        crate::auth::handlers::upload_profile_photo,
        crate::auth::handlers::list_favorites,
        crate::auth::handlers::get_public_user,

        // Owner recipes
        crate::handlers::create_recipe,
        crate::handlers::list_my_recipes,
        crate::handlers::get_my_recipe,
        crate::handlers::update_recipe,
        crate::handlers::set_visibility,
        crate::handlers::delete_recipe,
        crate::handlers::upload_cover,
        crate::handlers::add_stage,
        crate::handlers::add_recipe_ingredient,
        crate::handlers::remove_recipe_ingredient,

        // Stages
        crate::handlers::update_stage,
        crate::handlers::delete_stage,
        crate::handlers::upload_stage_photo,
        crate::handlers::delete_photo,

        // Public recipes
        crate::handlers::list_recipes,
        crate::handlers::search_recipes,
        crate::handlers::get_recipe,
        crate::handlers::add_favorite,
        crate::handlers::remove_favorite,

        // Comments
        crate::handlers::list_comments,
        crate::handlers::get_comment,
        crate::handlers::create_comment,
        crate::handlers::delete_comment,

        // Catalog and files
        crate::handlers::list_ingredients,
        crate::handlers::create_ingredient,
        crate::handlers::get_asset,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            CreatedResponse,
            ErrorResponse,
            SignupRequest,
            SigninRequest,
            UpdateProfileRequest,
            TokenResponse,
            ProfileResponse,
            PhotoResponse,
            PublicUser,
            Recipe,
            RecipeFields,
            RecipeDetails,
            VisibilityRequest,
            CoverResponse,
            Stage,
            StageDetails,
            StageRequest,
            Photo,
            StagePhotoResponse,
            Ingredient,
            NewIngredient,
            RecipeIngredient,
            AddIngredientRequest,
            Comment,
            CommentRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Accounts", description = "Registration, login and profile"),
        (name = "My recipes", description = "Recipes managed by their owner"),
        (name = "Stages", description = "Cooking stages and their photos"),
        (name = "Recipes", description = "Published recipes and favorites"),
        (name = "Comments", description = "Comments and ratings"),
        (name = "Ingredients", description = "Shared ingredient catalog"),
        (name = "Assets", description = "Uploaded images"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Bearer token scheme referenced by authenticated routes
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

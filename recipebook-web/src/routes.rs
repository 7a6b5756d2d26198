//! Route definitions for the Recipe Book API
//!
//! Everything here is nested under `/api` by `create_app`.

use crate::{auth, handlers, openapi, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health and docs
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        // Accounts
        .route("/signup", post(auth::handlers::signup))
        .route("/signin", post(auth::handlers::signin))
        .route(
            "/profile",
            get(auth::handlers::get_profile)
                .put(auth::handlers::update_profile)
                .delete(auth::handlers::delete_profile),
        )
        .route("/profile/photo", post(auth::handlers::upload_profile_photo))
        .route("/profile/favorites", get(auth::handlers::list_favorites))
        .route("/users/{id}", get(auth::handlers::get_public_user))
        // Owner recipe management
        .route(
            "/my-recipes",
            get(handlers::list_my_recipes).post(handlers::create_recipe),
        )
        .route(
            "/my-recipes/{id}",
            get(handlers::get_my_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route("/my-recipes/{id}/visibility", put(handlers::set_visibility))
        .route("/my-recipes/{id}/cover", post(handlers::upload_cover))
        .route("/my-recipes/{id}/stages", post(handlers::add_stage))
        .route(
            "/my-recipes/{id}/ingredients",
            post(handlers::add_recipe_ingredient),
        )
        .route(
            "/my-recipes/{id}/ingredients/{ingredient_id}",
            delete(handlers::remove_recipe_ingredient),
        )
        .route(
            "/stages/{stage_id}",
            put(handlers::update_stage).delete(handlers::delete_stage),
        )
        .route("/stages/{stage_id}/photos", post(handlers::upload_stage_photo))
        .route("/photos/{photo_id}", delete(handlers::delete_photo))
        // Public recipes
        .route("/recipes", get(handlers::list_recipes))
        .route("/recipes/search", get(handlers::search_recipes))
        .route("/recipes/{id}", get(handlers::get_recipe))
        .route(
            "/recipes/{id}/favorite",
            post(handlers::add_favorite).delete(handlers::remove_favorite),
        )
        .route(
            "/recipes/{id}/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(
            "/recipes/{id}/comments/{comment_id}",
            get(handlers::get_comment).delete(handlers::delete_comment),
        )
        // Catalog and uploaded files
        .route(
            "/ingredients",
            get(handlers::list_ingredients).post(handlers::create_ingredient),
        )
        .route("/assets/{filename}", get(handlers::get_asset))
}

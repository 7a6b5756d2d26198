//! Account handlers: registration, login and the caller's profile

use super::{
    users::{ProfileUpdate, SigninRequest, SignupRequest, UpdateProfileRequest},
    AuthUser,
};
use crate::{
    handlers::types::{ErrorResponse, MessageResponse, PhotoResponse, ProfileResponse, TokenResponse},
    AppState, WebResult,
};
use axum::{
    extract::{Multipart, Path, State},
    response::Json,
    Json as JsonExtractor,
};
use recipebook_core::{not_found_error, PublicUser, Recipe};
use tracing::info;

/// User registration endpoint
#[utoipa::path(
    post,
    path = "/api/signup",
    tag = "Accounts",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing field, short password or mismatch", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(app_state): State<AppState>,
    JsonExtractor(request): JsonExtractor<SignupRequest>,
) -> WebResult<Json<MessageResponse>> {
    info!("Signup attempt: {}", request.login);
    app_state.user_service.signup(request).await?;
    Ok(Json(MessageResponse::new("Account created")))
}

/// User login endpoint
#[utoipa::path(
    post,
    path = "/api/signin",
    tag = "Accounts",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Missing login or password", body = ErrorResponse),
        (status = 401, description = "Unknown user or wrong password", body = ErrorResponse)
    )
)]
pub async fn signin(
    State(app_state): State<AppState>,
    JsonExtractor(request): JsonExtractor<SigninRequest>,
) -> WebResult<Json<TokenResponse>> {
    let token = app_state.user_service.signin(request).await?;
    Ok(Json(TokenResponse {
        message: "Signed in".to_string(),
        token,
    }))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn get_profile(AuthUser(user): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        message: "Profile".to_string(),
        id: user.id,
        username: user.username,
        email: user.email,
        photo: user.photo,
    })
}

/// Change login, email or password
#[utoipa::path(
    put,
    path = "/api/profile",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated or nothing to change", body = MessageResponse),
        (status = 400, description = "Password change rejected", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonExtractor(request): JsonExtractor<UpdateProfileRequest>,
) -> WebResult<Json<MessageResponse>> {
    let message = match app_state.user_service.update_profile(&user, request).await? {
        ProfileUpdate::Updated => "Profile updated",
        ProfileUpdate::NothingToChange => "Nothing to change",
    };
    Ok(Json(MessageResponse::new(message)))
}

/// Delete the caller's account along with their recipes and comments
#[utoipa::path(
    delete,
    path = "/api/profile",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn delete_profile(
    State(app_state): State<AppState>,
    user: AuthUser,
) -> WebResult<Json<MessageResponse>> {
    app_state.db.soft_delete_user(user.id()).await?;
    Ok(Json(MessageResponse::new("Account deleted")))
}

/// Upload a profile picture (multipart field `file`)
#[utoipa::path(
    post,
    path = "/api/profile/photo",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body(content_type = "multipart/form-data", description = "Image in field `file`"),
    responses(
        (status = 200, description = "Photo stored", body = PhotoResponse),
        (status = 400, description = "Not a png, jpg or gif", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
pub async fn upload_profile_photo(
    State(app_state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> WebResult<Json<PhotoResponse>> {
    let photo = app_state.uploads.save_from_multipart(multipart).await?;
    app_state.db.set_user_photo(user.id(), &photo).await?;
    Ok(Json(PhotoResponse {
        message: "Photo updated".to_string(),
        photo,
    }))
}

/// Recipes the caller favorited and can still read
#[utoipa::path(
    get,
    path = "/api/profile/favorites",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Favorite recipes", body = [Recipe]),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn list_favorites(
    State(app_state): State<AppState>,
    user: AuthUser,
) -> WebResult<Json<Vec<Recipe>>> {
    Ok(Json(app_state.db.list_favorite_recipes(user.id()).await?))
}

/// Public view of another account
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Accounts",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Public profile", body = PublicUser),
        (status = 404, description = "No such user", body = ErrorResponse)
    )
)]
pub async fn get_public_user(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> WebResult<Json<PublicUser>> {
    let user = app_state
        .db
        .find_user(id)
        .await?
        .ok_or_else(|| not_found_error!("User", "accounts"))?;
    Ok(Json(user.to_public()))
}

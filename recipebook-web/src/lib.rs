//! Recipe Book Web Server
//!
//! JSON API over axum: accounts, recipes with their stages, photos and
//! ingredients, comments, favorites and uploaded images.

pub mod auth;
pub mod db;
pub mod files;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use server::{RecipeBookServer, RecipeBookServerBuilder};
pub use state::AppState;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit},
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method, StatusCode,
    },
    response::{IntoResponse, Json, Response},
    Router,
};
use recipebook_core::RecipeBookError;
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

/// Room for multipart framing on top of the largest accepted file
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);
    // Cross-origin callers are only accepted in development
    let cors = if state.config.server.dev_mode {
        cors.allow_origin(Any)
    } else {
        cors
    };

    let body_limit = state.config.uploads.max_file_size_bytes() + MULTIPART_OVERHEAD;

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error(transparent)]
    Core(#[from] RecipeBookError),

    #[error(transparent)]
    Auth(#[from] auth::jwt::AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Upload error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("File exceeds the {limit_mb} MB upload limit")]
    PayloadTooLarge { limit_mb: usize },
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            WebError::Auth(err) => return err.into_response(),
            WebError::Core(err) => {
                err.log();
                let status = match &err {
                    RecipeBookError::Authentication { .. } => StatusCode::UNAUTHORIZED,
                    RecipeBookError::Forbidden { .. } => StatusCode::FORBIDDEN,
                    RecipeBookError::Validation { .. } => StatusCode::BAD_REQUEST,
                    RecipeBookError::NotFound { .. } => StatusCode::NOT_FOUND,
                    RecipeBookError::Conflict { .. } => StatusCode::CONFLICT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = match &err {
                    RecipeBookError::NotFound { resource, .. } => {
                        format!("{} not found", resource)
                    }
                    RecipeBookError::Authentication { message, .. }
                    | RecipeBookError::Forbidden { message, .. }
                    | RecipeBookError::Validation { message, .. }
                    | RecipeBookError::Conflict { message, .. } => message.clone(),
                    _ => "Internal server error".to_string(),
                };
                (status, err.code(), message)
            }
            WebError::Multipart(err) => {
                let status = err.status();
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "payload_too_large"
                } else {
                    "invalid_upload"
                };
                (status, code, err.body_text())
            }
            WebError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                self.to_string(),
            ),
            WebError::Database(ref err) => {
                error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "Internal server error".to_string(),
                )
            }
            WebError::Server(ref err) => {
                error!("I/O error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "error": code,
                "message": message,
            })),
        )
            .into_response()
    }
}

/// True when a write failed on a UNIQUE index
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// Initialize logging for the web server
pub fn init_logging(
    config: &recipebook_core::LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    recipebook_core::init_logging(config)
}

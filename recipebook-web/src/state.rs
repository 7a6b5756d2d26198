//! Application state shared by all handlers

use crate::{
    auth::{jwt::JwtService, users::UserService},
    db::Database,
    files::UploadStore,
    WebResult,
};
use recipebook_core::RecipeBookConfig;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RecipeBookConfig>,
    pub db: Database,
    pub jwt: JwtService,
    /// Account registration, login and profile changes
    pub user_service: UserService,
    pub uploads: UploadStore,
}

impl AppState {
    /// Connect the database, prepare the upload directory and wire services
    pub async fn new(config: RecipeBookConfig) -> WebResult<Self> {
        let db = Database::connect(&config.database).await?;

        let uploads = UploadStore::new(&config.uploads);
        uploads.ensure_dir().await?;
        info!("Uploads directory: {}", uploads.dir().display());

        let jwt = JwtService::new(&config.auth.jwt_secret, config.auth.token_ttl_hours);
        let user_service = UserService::new(
            db.clone(),
            jwt.clone(),
            config.auth.min_password_length,
        );

        Ok(Self {
            config: Arc::new(config),
            db,
            jwt,
            user_service,
            uploads,
        })
    }
}

/// State over an in-memory database and a scratch upload directory
#[cfg(test)]
pub(crate) async fn test_state() -> (AppState, tempfile::TempDir) {
    let uploads = tempfile::tempdir().unwrap();

    let mut config = RecipeBookConfig::default();
    config.server.dev_mode = true;
    config.database.url = "sqlite::memory:".to_string();
    config.auth.jwt_secret = "test-secret-for-unit-tests".to_string();
    config.uploads.dir = uploads.path().to_path_buf();

    let state = AppState::new(config).await.unwrap();
    (state, uploads)
}

//! Account endpoint types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "Signed in")]
    pub message: String,
    pub token: String,
}

/// The caller's own account, email included
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub message: String,
    pub id: i64,
    pub username: String,
    pub email: String,
    pub photo: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PhotoResponse {
    pub message: String,
    /// Stored file name, served under /api/assets
    pub photo: String,
}

//! Account registration, login and profile changes

use super::jwt::{AuthError, JwtService};
use crate::{
    db::{Database, ProfileChanges},
    WebResult,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use recipebook_core::{conflict_error, validation_error, User};
use serde::Deserialize;
use tracing::{debug, info};
use utoipa::ToSchema;

/// User registration request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    #[schema(example = "julia")]
    pub login: String,
    #[schema(example = "julia@example.com")]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// User login request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SigninRequest {
    #[schema(example = "julia")]
    pub login: String,
    pub password: String,
}

/// Profile update; empty fields are left unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub login: String,
    pub email: String,
    pub old_password: String,
    pub password: String,
    pub confirm_password: String,
}

/// Outcome of a profile update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileUpdate {
    Updated,
    NothingToChange,
}

#[derive(Clone)]
pub struct UserService {
    db: Database,
    jwt: JwtService,
    min_password_length: usize,
}

impl UserService {
    pub fn new(db: Database, jwt: JwtService, min_password_length: usize) -> Self {
        Self {
            db,
            jwt,
            min_password_length,
        }
    }

    /// Register new user
    pub async fn signup(&self, request: SignupRequest) -> WebResult<i64> {
        let login = request.login.trim();
        let email = request.email.trim();

        if login.is_empty() {
            return Err(validation_error!("Login is required", "login", "accounts").into());
        }
        if email.is_empty() {
            return Err(validation_error!("Email is required", "email", "accounts").into());
        }
        self.check_new_password(&request.password, &request.confirm_password)?;

        let hash = hash_password(&request.password)?;
        let id = self.db.create_user(login, email, &hash).await?;

        info!(user_id = id, "User registered: {}", login);
        Ok(id)
    }

    /// Authenticate and issue an access token
    pub async fn signin(&self, request: SigninRequest) -> WebResult<String> {
        if request.login.trim().is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingCredentials.into());
        }

        let user = self
            .db
            .find_user_by_username(request.login.trim())
            .await?
            .ok_or_else(|| {
                debug!("Signin failed: unknown user {}", request.login);
                AuthError::InvalidCredentials
            })?;

        if !verify_password(&request.password, &user.password_hash) {
            debug!("Signin failed: wrong password for {}", user.username);
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.jwt.issue(user.id, &user.username, user.rights)?;
        info!(user_id = user.id, "User signed in");
        Ok(token)
    }

    /// Validate every requested change, then apply them in one write
    pub async fn update_profile(
        &self,
        user: &User,
        request: UpdateProfileRequest,
    ) -> WebResult<ProfileUpdate> {
        let mut changes = ProfileChanges::default();

        let login = request.login.trim();
        if !login.is_empty() && login != user.username {
            changes.username = Some(login.to_string());
        }
        let email = request.email.trim();
        if !email.is_empty() && email != user.email {
            changes.email = Some(email.to_string());
        }

        if !request.password.is_empty() || !request.confirm_password.is_empty() {
            if request.old_password.is_empty() {
                return Err(validation_error!(
                    "Old password is required to set a new one",
                    "old_password",
                    "accounts"
                )
                .into());
            }
            if !verify_password(&request.old_password, &user.password_hash) {
                return Err(
                    validation_error!("Old password is incorrect", "old_password", "accounts")
                        .into(),
                );
            }
            self.check_new_password(&request.password, &request.confirm_password)?;
            changes.password_hash = Some(hash_password(&request.password)?);
        }

        if changes.is_empty() {
            return Ok(ProfileUpdate::NothingToChange);
        }

        if self
            .db
            .credentials_taken(
                changes.username.as_deref(),
                changes.email.as_deref(),
                user.id,
            )
            .await?
        {
            return Err(conflict_error!("Username or email is already taken", "accounts").into());
        }

        self.db.update_profile(user.id, &changes).await?;
        info!(user_id = user.id, "Profile updated");
        Ok(ProfileUpdate::Updated)
    }

    fn check_new_password(&self, password: &str, confirm: &str) -> WebResult<()> {
        if password.is_empty() {
            return Err(validation_error!("Password is required", "password", "accounts").into());
        }
        if password.chars().count() < self.min_password_length {
            return Err(validation_error!(
                format!(
                    "Password must be at least {} characters",
                    self.min_password_length
                ),
                "password",
                "accounts"
            )
            .into());
        }
        if password != confirm {
            return Err(validation_error!(
                "Passwords do not match",
                "confirm_password",
                "accounts"
            )
            .into());
        }
        Ok(())
    }
}

/// Hash password using Argon2
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Hashing)
}

/// Verify password against hash; a malformed hash never matches
fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

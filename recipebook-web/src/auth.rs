//! Authentication extractors
//!
//! A bearer token is only half of an identity: the user it names must still
//! exist. Both extractors look the account up on every request, so a token
//! issued before the account was deleted stops working immediately.

pub mod handlers;
pub mod jwt;
pub mod users;


use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use recipebook_core::{AccessContext, Identity, User};
use tracing::{debug, warn};

/// Authenticated caller; rejects the request with 401 otherwise
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.0.id, self.0.username.clone(), self.0.rights)
    }

    pub fn context(&self) -> AccessContext {
        AccessContext::user(self.identity())
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let claims = jwt::Claims::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match app_state.db.find_user(claims.sub).await {
            Ok(Some(user)) => Ok(AuthUser(user)),
            Ok(None) => {
                debug!(user_id = claims.sub, "Token for missing or deleted user");
                Err(jwt::AuthError::UnknownUser.into_response())
            }
            Err(e) => {
                warn!("Identity lookup failed: {}", e);
                Err(e.into_response())
            }
        }
    }
}

/// Optional user extractor - anonymous when no usable token is present
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthUser>);

impl OptionalUser {
    pub fn context(&self) -> AccessContext {
        self.0
            .as_ref()
            .map(AuthUser::context)
            .unwrap_or_else(AccessContext::anonymous)
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if parts.headers.get("authorization").is_none() {
            return Ok(OptionalUser(None));
        }

        // A bad or stale token on a public route degrades to anonymous
        Ok(OptionalUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}

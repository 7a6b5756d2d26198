//! Recipe Book core
//!
//! Domain types, the access policy shared by every request path, and the
//! configuration, error and logging plumbing used by the server.

pub mod config;
pub mod error;
pub mod logging;
pub mod policy;
pub mod types;

pub use config::{AuthConfig, DatabaseConfig, RecipeBookConfig, ServerConfig, UploadConfig};
pub use error::{ErrorContext, RecipeBookError, RecipeBookResult};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use policy::{
    authorize, ensure, validate_rating, AccessContext, AccessDecision, Action, DenyReason,
    Identity, Owned, Visible, MAX_RATING, MIN_RATING,
};
pub use types::*;

//! Unified error handling system
//!
//! Structured error types with context and proper error chaining. Every
//! variant maps onto one HTTP status class in the web layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

pub type RecipeBookResult<T> = Result<T, RecipeBookError>;

/// Error context providing additional information for debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

/// Main error type for the Recipe Book system
#[derive(Error, Debug)]
pub enum RecipeBookError {
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        context: ErrorContext,
    },

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

}

impl RecipeBookError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            RecipeBookError::Authentication { context, .. } => Some(context),
            RecipeBookError::Forbidden { context, .. } => Some(context),
            RecipeBookError::Validation { context, .. } => Some(context),
            RecipeBookError::NotFound { context, .. } => Some(context),
            RecipeBookError::Conflict { context, .. } => Some(context),
            RecipeBookError::Config { context, .. } => Some(context),
            RecipeBookError::Io(_) => None,
        }
    }

    /// Whether the caller caused this error (4xx rather than 5xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RecipeBookError::Authentication { .. }
                | RecipeBookError::Forbidden { .. }
                | RecipeBookError::Validation { .. }
                | RecipeBookError::NotFound { .. }
                | RecipeBookError::Conflict { .. }
        )
    }

    /// Stable machine-readable code used in JSON error bodies
    pub fn code(&self) -> &'static str {
        match self {
            RecipeBookError::Authentication { .. } => "unauthorized",
            RecipeBookError::Forbidden { .. } => "forbidden",
            RecipeBookError::Validation { .. } => "validation_failed",
            RecipeBookError::NotFound { .. } => "not_found",
            RecipeBookError::Conflict { .. } => "conflict",
            RecipeBookError::Config { .. } => "config_error",
            RecipeBookError::Io(_) => "io_error",
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let error_id = self.context().map(|c| c.error_id.as_str());
        match self {
            RecipeBookError::Authentication { .. }
            | RecipeBookError::Forbidden { .. }
            | RecipeBookError::NotFound { .. } => {
                debug!(error_id = ?error_id, error = %self, "Request rejected");
            }
            RecipeBookError::Validation { .. } | RecipeBookError::Conflict { .. } => {
                warn!(error_id = ?error_id, error = %self, "Invalid request");
            }
            _ => {
                error!(error_id = ?error_id, error = %self, "Error occurred");
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::RecipeBookError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component),
        }
    };
    ($msg:expr, $component:expr) => {
        $crate::RecipeBookError::Validation {
            message: $msg.to_string(),
            field: None,
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        $crate::RecipeBookError::NotFound {
            resource: $resource.to_string(),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! forbidden_error {
    ($msg:expr, $component:expr) => {
        $crate::RecipeBookError::Forbidden {
            message: $msg.to_string(),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! conflict_error {
    ($msg:expr, $component:expr) => {
        $crate::RecipeBookError::Conflict {
            message: $msg.to_string(),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! auth_error {
    ($msg:expr, $component:expr) => {
        $crate::RecipeBookError::Authentication {
            message: $msg.to_string(),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_classified() {
        let err = validation_error!("Rating out of range", "rate", "comments");
        assert!(err.is_client_error());
        assert_eq!(err.code(), "validation_failed");

        match &err {
            RecipeBookError::Validation { field, context, .. } => {
                assert_eq!(field.as_deref(), Some("rate"));
                assert_eq!(context.component, "comments");
                assert!(!context.error_id.is_empty());
            }
            _ => panic!("Expected Validation error"),
        }

        assert!(not_found_error!("recipe 7", "recipes").is_client_error());
        assert!(forbidden_error!("not yours", "recipes").is_client_error());
        assert!(conflict_error!("taken", "users").is_client_error());
        assert!(auth_error!("no token", "auth").is_client_error());
    }

    #[test]
    fn test_server_errors_are_not_client_errors() {
        let io = RecipeBookError::from(std::io::Error::other("disk"));
        assert!(!io.is_client_error());
        assert!(io.context().is_none());
        assert_eq!(io.code(), "io_error");

        let config = RecipeBookError::Config {
            message: "bad port".to_string(),
            source: None,
            context: ErrorContext::new("config"),
        };
        assert!(!config.is_client_error());
        assert_eq!(config.code(), "config_error");

        // Logging never panics
        io.log();
        config.log();
    }

    #[test]
    fn test_context_builder() {
        let ctx = ErrorContext::new("uploads")
            .with_operation("save")
            .with_metadata("file", "a.png");
        assert_eq!(ctx.operation.as_deref(), Some("save"));
        assert_eq!(ctx.metadata.get("file").map(String::as_str), Some("a.png"));
    }
}

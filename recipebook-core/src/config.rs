//! Configuration management

use crate::error::{ErrorContext, RecipeBookError, RecipeBookResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Development signing key; `validate` rejects it outside dev mode.
pub const DEFAULT_JWT_SECRET: &str = "recipebook-default-secret-change-in-production";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeBookConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Relaxes secret validation and enables permissive CORS
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1337,
            dev_mode: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:recipe_book.db".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// In-memory databases live and die with a single connection
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

/// Token and password settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_hours: 24 * 30,
            min_password_length: 6,
        }
    }
}

/// File upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_file_size_mb: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir().join("recipe_book_uploads"),
            max_file_size_mb: 10,
        }
    }
}

impl UploadConfig {
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl RecipeBookConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> RecipeBookResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RecipeBookError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("read_file"),
        })?;

        toml::from_str(&content).map_err(|e| RecipeBookError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("parse_toml"),
        })
    }

    /// Apply overrides from environment variables
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("RECIPEBOOK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RECIPEBOOK_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(dev) = lookup("RECIPEBOOK_DEV_MODE").and_then(|d| d.parse().ok()) {
            self.server.dev_mode = dev;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(dir) = lookup("RECIPEBOOK_UPLOADS_DIR") {
            self.uploads.dir = PathBuf::from(dir);
        }
    }

    /// Server bind address
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Validate configuration
    pub fn validate(&self) -> RecipeBookResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(config_invalid("server.host must not be empty"));
        }
        if self.database.url.trim().is_empty() {
            return Err(config_invalid("database.url must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(config_invalid("database.max_connections must be positive"));
        }
        if self.auth.jwt_secret.len() < 16 {
            return Err(config_invalid(
                "auth.jwt_secret must be at least 16 bytes long",
            ));
        }
        if !self.server.dev_mode && self.auth.jwt_secret == DEFAULT_JWT_SECRET {
            return Err(config_invalid(
                "auth.jwt_secret must be changed outside development mode",
            ));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(config_invalid("auth.token_ttl_hours must be positive"));
        }
        if self.uploads.max_file_size_mb == 0 {
            return Err(config_invalid("uploads.max_file_size_mb must be positive"));
        }
        Ok(())
    }
}

fn config_invalid(message: &str) -> RecipeBookError {
    RecipeBookError::Config {
        message: message.to_string(),
        source: None,
        context: ErrorContext::new("config").with_operation("validate"),
    }
}

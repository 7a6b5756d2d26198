//! Recipe Book web server
//!
//! Binds the configured address and serves the router from `create_app`.

use crate::{create_app, AppState, WebError, WebResult};
use axum::serve;
use recipebook_core::RecipeBookConfig;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{error, info};

pub struct RecipeBookServer {
    config: RecipeBookConfig,
    state: AppState,
}

impl RecipeBookServer {
    /// Validate the configuration and build the shared state
    pub async fn new(config: RecipeBookConfig) -> WebResult<Self> {
        config.validate()?;
        let state = AppState::new(config.clone()).await?;

        Ok(Self { config, state })
    }

    /// Serve until Ctrl+C or SIGTERM
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting Recipe Book server");
        info!("Development mode: {}", self.config.server.dev_mode);

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        if let Err(e) = serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server stopped");
        Ok(())
    }

    pub fn config(&self) -> &RecipeBookConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Builder for RecipeBookServer
pub struct RecipeBookServerBuilder {
    config: RecipeBookConfig,
}

impl RecipeBookServerBuilder {
    pub fn new() -> Self {
        Self {
            config: RecipeBookConfig::default(),
        }
    }

    /// Start from an already loaded configuration
    pub fn config(mut self, config: RecipeBookConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.server.dev_mode = dev_mode;
        self
    }

    pub fn database_url<S: Into<String>>(mut self, database_url: S) -> Self {
        self.config.database.url = database_url.into();
        self
    }

    pub fn jwt_secret<S: Into<String>>(mut self, secret: S) -> Self {
        self.config.auth.jwt_secret = secret.into();
        self
    }

    pub fn uploads_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.uploads.dir = dir.into();
        self
    }

    /// Build the server
    pub async fn build(self) -> WebResult<RecipeBookServer> {
        RecipeBookServer::new(self.config).await
    }
}

impl Default for RecipeBookServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

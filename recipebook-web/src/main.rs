//! Recipe Book Web Server
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! environment variables, then command line flags.

use anyhow::{anyhow, Context};
use clap::Parser;
use recipebook_core::RecipeBookConfig;
use recipebook_web::{init_logging, RecipeBookServerBuilder};
use std::path::PathBuf;
use tracing::info;

/// Recipe Book Web Server - share recipes, comments and favorites
#[derive(Parser)]
#[command(name = "recipebook-web")]
#[command(about = "JSON API for sharing recipes")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// SQLite database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Directory for uploaded images
    #[arg(long)]
    uploads_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(self, config: &mut RecipeBookConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.dev {
            config.server.dev_mode = true;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
        if let Some(dir) = self.uploads_dir {
            config.uploads.dir = dir;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let mut config = match &args.config {
        Some(path) => RecipeBookConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RecipeBookConfig::default(),
    };
    config.apply_env();
    args.apply(&mut config);

    init_logging(&config.logging).map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    info!("Database: {}", config.database.url);
    info!("Uploads: {}", config.uploads.dir.display());

    let server = RecipeBookServerBuilder::new()
        .config(config)
        .build()
        .await
        .context("failed to build server")?;

    server.start().await.context("server failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["recipebook-web"]);
        assert!(args.host.is_none());
        assert!(args.port.is_none());
        assert!(!args.dev);

        let args = Args::parse_from([
            "recipebook-web",
            "--host",
            "0.0.0.0",
            "--port",
            "3000",
            "--dev",
            "--uploads-dir",
            "/srv/uploads",
        ]);
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(3000));
        assert!(args.dev);
        assert_eq!(args.uploads_dir, Some(PathBuf::from("/srv/uploads")));
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = RecipeBookConfig::default();
        let args = Args::parse_from(["recipebook-web", "--port", "8081", "--log-level", "debug"]);
        args.apply(&mut config);

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.level, "debug");
        assert!(!config.server.dev_mode);
    }
}

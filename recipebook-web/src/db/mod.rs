//! SQLite persistence
//!
//! Every table is soft-deleted through a nullable `deleted_at` column and
//! every read filters on it. Uniqueness is enforced by partial indexes over
//! live rows, so a deleted username or ingredient name can be reused.

mod comments;
mod favorites;
mod ingredients;
mod recipes;
mod stages;
mod users;

pub use recipes::Page;
pub use users::ProfileChanges;

use crate::{is_unique_violation, WebError, WebResult};
use recipebook_core::{conflict_error, DatabaseConfig};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use tracing::{debug, info};

/// Connection pool plus the queries the handlers need
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and create the schema
    pub async fn connect(config: &DatabaseConfig) -> WebResult<Self> {
        info!("Connecting to database: {}", config.url);

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Each connection to `:memory:` is a separate database
        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;

        let db = Self { pool };
        db.create_tables().await?;
        info!("Database ready");
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> WebResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_tables(&self) -> WebResult<()> {
        for (name, ddl) in SCHEMA {
            debug!("Creating {}", name);
            sqlx::query(ddl).execute(&self.pool).await.map_err(|e| {
                tracing::error!("Failed to create {}: {}", name, e);
                WebError::Database(e)
            })?;
        }
        Ok(())
    }
}

/// A UNIQUE violation becomes a conflict; anything else stays a storage error
fn unique_or(err: sqlx::Error, message: &str) -> WebError {
    if is_unique_violation(&err) {
        WebError::Core(conflict_error!(message, "database"))
    } else {
        WebError::Database(err)
    }
}

const SCHEMA: &[(&str, &str)] = &[
    (
        "users table",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            rights INTEGER NOT NULL DEFAULT 0,
            photo TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
    ),
    (
        "users username index",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users(username) WHERE deleted_at IS NULL",
    ),
    (
        "users email index",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(email) WHERE deleted_at IS NULL",
    ),
    (
        "recipes table",
        r#"
        CREATE TABLE IF NOT EXISTS recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            name TEXT NOT NULL DEFAULT '',
            name_lower TEXT NOT NULL DEFAULT '',
            servings INTEGER NOT NULL DEFAULT 0,
            time INTEGER NOT NULL DEFAULT 0,
            country TEXT NOT NULL DEFAULT '',
            kind TEXT NOT NULL DEFAULT '',
            cover TEXT NOT NULL DEFAULT '',
            visible INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
    ),
    (
        "recipes owner index",
        "CREATE INDEX IF NOT EXISTS idx_recipes_user ON recipes(user_id)",
    ),
    (
        "stages table",
        r#"
        CREATE TABLE IF NOT EXISTS stages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id),
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
    ),
    (
        "photos table",
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            stage_id INTEGER NOT NULL REFERENCES stages(id),
            image TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
    ),
    (
        "ingredients table",
        r#"
        CREATE TABLE IF NOT EXISTS ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            calories REAL NOT NULL DEFAULT 0,
            proteins REAL NOT NULL DEFAULT 0,
            fats REAL NOT NULL DEFAULT 0,
            carbohydrates REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
    ),
    (
        "ingredients name index",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_ingredients_name ON ingredients(name) WHERE deleted_at IS NULL",
    ),
    (
        "recipe_ingredients table",
        r#"
        CREATE TABLE IF NOT EXISTS recipe_ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id),
            ingredient_id INTEGER NOT NULL REFERENCES ingredients(id),
            quantity REAL NOT NULL CHECK (quantity > 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
    ),
    (
        "recipe_ingredients pair index",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_recipe_ingredients_pair ON recipe_ingredients(recipe_id, ingredient_id) WHERE deleted_at IS NULL",
    ),
    (
        "comments table",
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id),
            user_id INTEGER NOT NULL REFERENCES users(id),
            text TEXT NOT NULL,
            rate INTEGER NOT NULL CHECK (rate BETWEEN 0 AND 5),
            created_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
    ),
    (
        "favorites table",
        r#"
        CREATE TABLE IF NOT EXISTS favorites (
            user_id INTEGER NOT NULL REFERENCES users(id),
            recipe_id INTEGER NOT NULL REFERENCES recipes(id),
            created_at TEXT NOT NULL,
            PRIMARY KEY (user_id, recipe_id)
        )
        "#,
    ),
];

#[cfg(test)]
pub(crate) async fn test_db() -> Database {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    match Database::connect(&config).await {
        Ok(db) => db,
        Err(e) => panic!("in-memory database: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let db = test_db().await;
        db.create_tables().await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(
            tables,
            vec![
                "comments",
                "favorites",
                "ingredients",
                "photos",
                "recipe_ingredients",
                "recipes",
                "stages",
                "users",
            ]
        );
    }
}

//! Favorite relation between users and recipes

use super::Database;
use crate::WebResult;
use chrono::Utc;

impl Database {
    /// Idempotent
    pub async fn add_favorite(&self, user_id: i64, recipe_id: i64) -> WebResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO favorites (user_id, recipe_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Idempotent
    pub async fn remove_favorite(&self, user_id: i64, recipe_id: i64) -> WebResult<()> {
        sqlx::query("DELETE FROM favorites WHERE user_id = ? AND recipe_id = ?")
            .bind(user_id)
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Favorites from live accounts
    pub async fn count_favorites(&self, recipe_id: i64) -> WebResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM favorites f JOIN users u ON u.id = f.user_id
            WHERE f.recipe_id = ? AND u.deleted_at IS NULL
            "#,
        )
        .bind(recipe_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

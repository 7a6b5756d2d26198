//! Recipe comments

use super::Database;
use crate::WebResult;
use chrono::Utc;
use recipebook_core::Comment;
use sqlx::{sqlite::SqliteRow, Row};

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.recipe_id, c.user_id, u.username, c.text, c.rate, c.created_at
    FROM comments c JOIN users u ON u.id = c.user_id
"#;

fn comment_from_row(row: &SqliteRow) -> Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: row.try_get("id")?,
        recipe_id: row.try_get("recipe_id")?,
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        text: row.try_get("text")?,
        rate: row.try_get("rate")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    pub async fn create_comment(
        &self,
        recipe_id: i64,
        user_id: i64,
        text: &str,
        rate: i64,
    ) -> WebResult<i64> {
        let result = sqlx::query(
            "INSERT INTO comments (recipe_id, user_id, text, rate, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(recipe_id)
        .bind(user_id)
        .bind(text)
        .bind(rate)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Comments of a recipe, oldest first
    pub async fn list_comments(&self, recipe_id: i64) -> WebResult<Vec<Comment>> {
        let rows = sqlx::query(&format!(
            "{} WHERE c.recipe_id = ? AND c.deleted_at IS NULL ORDER BY c.id",
            COMMENT_SELECT
        ))
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(comment_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// A comment only counts as found under the recipe it belongs to
    pub async fn find_comment(&self, recipe_id: i64, id: i64) -> WebResult<Option<Comment>> {
        let row = sqlx::query(&format!(
            "{} WHERE c.id = ? AND c.recipe_id = ? AND c.deleted_at IS NULL",
            COMMENT_SELECT
        ))
        .bind(id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(comment_from_row).transpose()?)
    }

    pub async fn soft_delete_comment(&self, id: i64) -> WebResult<()> {
        sqlx::query("UPDATE comments SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Mean rating over live comments
    pub async fn average_rating(&self, recipe_id: i64) -> WebResult<Option<f64>> {
        let avg: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(rate) FROM comments WHERE recipe_id = ? AND deleted_at IS NULL",
        )
        .bind(recipe_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(avg)
    }
}

//! User accounts

use super::{recipes::RecipeScope, unique_or, Database};
use crate::WebResult;
use chrono::Utc;
use recipebook_core::User;
use sqlx::{sqlite::SqliteRow, Row};
use tracing::info;

/// Profile fields to overwrite; `None` leaves the column as is
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, rights, photo, created_at, updated_at";

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        rights: row.try_get("rights")?,
        photo: row.try_get("photo")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> WebResult<i64> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_or(e, "Username or email is already taken"))?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_user(&self, id: i64) -> WebResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE id = ? AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    pub async fn find_user_by_username(&self, username: &str) -> WebResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = ? AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    /// Whether another live account already uses this username or email
    pub async fn credentials_taken(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except_id: i64,
    ) -> WebResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE deleted_at IS NULL AND id != ? AND (username = ? OR email = ?)",
        )
        .bind(except_id)
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn update_profile(&self, id: i64, changes: &ProfileChanges) -> WebResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                username = COALESCE(?, username),
                email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(changes.username.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_or(e, "Username or email is already taken"))?;

        Ok(())
    }

    pub async fn set_user_photo(&self, id: i64, photo: &str) -> WebResult<()> {
        sqlx::query("UPDATE users SET photo = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(photo)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Soft-delete the account with its recipes and comments, drop its favorites
    pub async fn soft_delete_user(&self, id: i64) -> WebResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        super::recipes::soft_delete_recipes(&mut tx, RecipeScope::OwnedBy(id), now).await?;

        sqlx::query("UPDATE comments SET deleted_at = ? WHERE user_id = ? AND deleted_at IS NULL")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM favorites WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(user_id = id, "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_db;
    use super::*;
    use crate::WebError;
    use recipebook_core::RecipeBookError;

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let db = test_db().await;
        db.create_user("anna", "anna@example.com", "h").await.unwrap();

        let err = db
            .create_user("anna", "other@example.com", "h")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WebError::Core(RecipeBookError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_deleted_user_is_invisible_and_name_reusable() {
        let db = test_db().await;
        let id = db.create_user("boris", "boris@example.com", "h").await.unwrap();

        db.soft_delete_user(id).await.unwrap();
        assert!(db.find_user(id).await.unwrap().is_none());
        assert!(db.find_user_by_username("boris").await.unwrap().is_none());

        let again = db.create_user("boris", "boris@example.com", "h").await.unwrap();
        assert_ne!(again, id);
    }

    #[tokio::test]
    async fn test_profile_update_keeps_untouched_columns() {
        let db = test_db().await;
        let id = db.create_user("vera", "vera@example.com", "h1").await.unwrap();

        let changes = ProfileChanges {
            email: Some("vera@new.example.com".to_string()),
            ..Default::default()
        };
        db.update_profile(id, &changes).await.unwrap();

        let user = db.find_user(id).await.unwrap().unwrap();
        assert_eq!(user.username, "vera");
        assert_eq!(user.email, "vera@new.example.com");
        assert_eq!(user.password_hash, "h1");
    }

    #[tokio::test]
    async fn test_credentials_taken_ignores_self() {
        let db = test_db().await;
        let a = db.create_user("gleb", "gleb@example.com", "h").await.unwrap();
        let b = db.create_user("dina", "dina@example.com", "h").await.unwrap();

        assert!(!db.credentials_taken(Some("gleb"), None, a).await.unwrap());
        assert!(db.credentials_taken(Some("gleb"), None, b).await.unwrap());
        assert!(db
            .credentials_taken(None, Some("dina@example.com"), a)
            .await
            .unwrap());
    }
}

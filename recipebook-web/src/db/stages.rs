//! Cooking stages and their photos

use super::Database;
use crate::WebResult;
use chrono::Utc;
use recipebook_core::{Photo, Stage, StageDetails};
use sqlx::{sqlite::SqliteRow, Row};
use std::collections::HashMap;

fn stage_from_row(row: &SqliteRow) -> Result<Stage, sqlx::Error> {
    Ok(Stage {
        id: row.try_get("id")?,
        recipe_id: row.try_get("recipe_id")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn photo_from_row(row: &SqliteRow) -> Result<Photo, sqlx::Error> {
    Ok(Photo {
        id: row.try_get("id")?,
        stage_id: row.try_get("stage_id")?,
        image: row.try_get("image")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    pub async fn create_stage(&self, recipe_id: i64, description: &str) -> WebResult<i64> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO stages (recipe_id, description, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(recipe_id)
        .bind(description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Live stage whose recipe is live too
    pub async fn find_stage(&self, id: i64) -> WebResult<Option<Stage>> {
        let row = sqlx::query(
            r#"
            SELECT s.id, s.recipe_id, s.description, s.created_at, s.updated_at
            FROM stages s JOIN recipes r ON r.id = s.recipe_id
            WHERE s.id = ? AND s.deleted_at IS NULL AND r.deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(stage_from_row).transpose()?)
    }

    pub async fn update_stage(&self, id: i64, description: &str) -> WebResult<()> {
        sqlx::query(
            "UPDATE stages SET description = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(description)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn soft_delete_stage(&self, id: i64) -> WebResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE photos SET deleted_at = ? WHERE stage_id = ? AND deleted_at IS NULL")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE stages SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn add_stage_photo(&self, stage_id: i64, image: &str) -> WebResult<i64> {
        let result =
            sqlx::query("INSERT INTO photos (stage_id, image, created_at) VALUES (?, ?, ?)")
                .bind(stage_id)
                .bind(image)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_photo(&self, id: i64) -> WebResult<Option<Photo>> {
        let row = sqlx::query(
            "SELECT id, stage_id, image, created_at FROM photos WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(photo_from_row).transpose()?)
    }

    pub async fn soft_delete_photo(&self, id: i64) -> WebResult<()> {
        sqlx::query("UPDATE photos SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Stages in creation order, each with its photos
    pub async fn list_stage_details(&self, recipe_id: i64) -> WebResult<Vec<StageDetails>> {
        let stage_rows = sqlx::query(
            r#"
            SELECT id, recipe_id, description, created_at, updated_at FROM stages
            WHERE recipe_id = ? AND deleted_at IS NULL ORDER BY id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        let photo_rows = sqlx::query(
            r#"
            SELECT p.id, p.stage_id, p.image, p.created_at FROM photos p
            JOIN stages s ON s.id = p.stage_id
            WHERE s.recipe_id = ? AND s.deleted_at IS NULL AND p.deleted_at IS NULL
            ORDER BY p.id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        let mut photos: HashMap<i64, Vec<Photo>> = HashMap::new();
        for row in &photo_rows {
            let photo = photo_from_row(row)?;
            photos.entry(photo.stage_id).or_default().push(photo);
        }

        stage_rows
            .iter()
            .map(|row| {
                let stage = stage_from_row(row)?;
                let photos = photos.remove(&stage.id).unwrap_or_default();
                Ok(StageDetails { stage, photos })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_db;

    #[tokio::test]
    async fn test_stage_delete_hides_its_photos() {
        let db = test_db().await;
        let user = db.create_user("cook", "cook@example.com", "h").await.unwrap();
        let recipe = db.create_recipe(user).await.unwrap();
        let keep = db.create_stage(recipe, "Boil water").await.unwrap();
        let doomed = db.create_stage(recipe, "Add salt").await.unwrap();
        db.add_stage_photo(keep, "keep.png").await.unwrap();
        let gone = db.add_stage_photo(doomed, "gone.png").await.unwrap();

        db.soft_delete_stage(doomed).await.unwrap();

        assert!(db.find_photo(gone).await.unwrap().is_none());
        let stages = db.list_stage_details(recipe).await.unwrap();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].stage.description, "Boil water");
        assert_eq!(stages[0].photos[0].image, "keep.png");
    }

    #[tokio::test]
    async fn test_stage_update() {
        let db = test_db().await;
        let user = db.create_user("cook", "cook@example.com", "h").await.unwrap();
        let recipe = db.create_recipe(user).await.unwrap();
        let stage = db.create_stage(recipe, "draft").await.unwrap();

        db.update_stage(stage, "final").await.unwrap();
        assert_eq!(
            db.find_stage(stage).await.unwrap().unwrap().description,
            "final"
        );
    }
}

//! Ingredient catalog and recipe ingredient links

use super::{unique_or, Database};
use crate::WebResult;
use chrono::Utc;
use recipebook_core::{Ingredient, NewIngredient, RecipeIngredient};
use sqlx::{sqlite::SqliteRow, Row};

fn ingredient_from_row(row: &SqliteRow) -> Result<Ingredient, sqlx::Error> {
    Ok(Ingredient {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        calories: row.try_get("calories")?,
        proteins: row.try_get("proteins")?,
        fats: row.try_get("fats")?,
        carbohydrates: row.try_get("carbohydrates")?,
        created_at: row.try_get("created_at")?,
    })
}

fn recipe_ingredient_from_row(row: &SqliteRow) -> Result<RecipeIngredient, sqlx::Error> {
    Ok(RecipeIngredient {
        id: row.try_get("id")?,
        recipe_id: row.try_get("recipe_id")?,
        ingredient_id: row.try_get("ingredient_id")?,
        name: row.try_get("name")?,
        quantity: row.try_get("quantity")?,
        calories: row.try_get("calories")?,
        proteins: row.try_get("proteins")?,
        fats: row.try_get("fats")?,
        carbohydrates: row.try_get("carbohydrates")?,
    })
}

impl Database {
    pub async fn list_ingredients(&self) -> WebResult<Vec<Ingredient>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, calories, proteins, fats, carbohydrates, created_at
            FROM ingredients WHERE deleted_at IS NULL ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(ingredient_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn find_ingredient(&self, id: i64) -> WebResult<Option<Ingredient>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, calories, proteins, fats, carbohydrates, created_at
            FROM ingredients WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(ingredient_from_row).transpose()?)
    }

    pub async fn create_ingredient(&self, new: &NewIngredient) -> WebResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO ingredients (name, calories, proteins, fats, carbohydrates, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.name.trim())
        .bind(new.calories)
        .bind(new.proteins)
        .bind(new.fats)
        .bind(new.carbohydrates)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| unique_or(e, "Ingredient already exists"))?;

        Ok(result.last_insert_rowid())
    }

    /// Link an ingredient to a recipe; one live link per pair
    pub async fn add_recipe_ingredient(
        &self,
        recipe_id: i64,
        ingredient_id: i64,
        quantity: f64,
    ) -> WebResult<i64> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(recipe_id)
        .bind(ingredient_id)
        .bind(quantity)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_or(e, "Ingredient is already in this recipe"))?;

        Ok(result.last_insert_rowid())
    }

    /// Returns false when the pair was not linked
    pub async fn remove_recipe_ingredient(
        &self,
        recipe_id: i64,
        ingredient_id: i64,
    ) -> WebResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE recipe_ingredients SET deleted_at = ?
            WHERE recipe_id = ? AND ingredient_id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now())
        .bind(recipe_id)
        .bind(ingredient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_recipe_ingredients(&self, recipe_id: i64) -> WebResult<Vec<RecipeIngredient>> {
        let rows = sqlx::query(
            r#"
            SELECT ri.id, ri.recipe_id, ri.ingredient_id, i.name, ri.quantity,
                   i.calories, i.proteins, i.fats, i.carbohydrates
            FROM recipe_ingredients ri JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ? AND ri.deleted_at IS NULL
            ORDER BY ri.id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(recipe_ingredient_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_db;
    use super::*;
    use crate::WebError;
    use recipebook_core::RecipeBookError;

    fn flour() -> NewIngredient {
        NewIngredient {
            name: "Flour".to_string(),
            calories: 364.0,
            proteins: 10.0,
            fats: 1.0,
            carbohydrates: 76.0,
        }
    }

    #[tokio::test]
    async fn test_catalog_names_are_unique() {
        let db = test_db().await;
        db.create_ingredient(&flour()).await.unwrap();

        let err = db.create_ingredient(&flour()).await.unwrap_err();
        assert!(matches!(
            err,
            WebError::Core(RecipeBookError::Conflict { .. })
        ));
        assert_eq!(db.list_ingredients().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_recipe_link_unique_until_removed() {
        let db = test_db().await;
        let user = db.create_user("baker", "baker@example.com", "h").await.unwrap();
        let recipe = db.create_recipe(user).await.unwrap();
        let ingredient = db.create_ingredient(&flour()).await.unwrap();

        db.add_recipe_ingredient(recipe, ingredient, 250.0).await.unwrap();
        assert!(db
            .add_recipe_ingredient(recipe, ingredient, 100.0)
            .await
            .is_err());

        let linked = db.list_recipe_ingredients(recipe).await.unwrap();
        assert_eq!(linked[0].name, "Flour");
        assert_eq!(linked[0].quantity, 250.0);

        assert!(db.remove_recipe_ingredient(recipe, ingredient).await.unwrap());
        assert!(!db.remove_recipe_ingredient(recipe, ingredient).await.unwrap());

        // A removed link frees the pair again
        db.add_recipe_ingredient(recipe, ingredient, 100.0).await.unwrap();
    }
}

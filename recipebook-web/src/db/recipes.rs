//! Recipes and their soft-delete cascade

use super::Database;
use crate::WebResult;
use chrono::{DateTime, Utc};
use recipebook_core::{Recipe, RecipeDetails, RecipeFields};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};
use tracing::debug;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Limit/offset window over a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Which recipes a cascade applies to
#[derive(Debug, Clone, Copy)]
pub(super) enum RecipeScope {
    One(i64),
    OwnedBy(i64),
}

impl RecipeScope {
    fn subquery(&self) -> &'static str {
        match self {
            RecipeScope::One(_) => "SELECT id FROM recipes WHERE id = ?",
            RecipeScope::OwnedBy(_) => "SELECT id FROM recipes WHERE user_id = ?",
        }
    }

    fn key(&self) -> i64 {
        match self {
            RecipeScope::One(id) | RecipeScope::OwnedBy(id) => *id,
        }
    }
}

/// Soft-delete recipes in `scope` together with their stages, photos,
/// ingredient links and comments. Runs on the caller's transaction.
pub(super) async fn soft_delete_recipes(
    conn: &mut SqliteConnection,
    scope: RecipeScope,
    now: DateTime<Utc>,
) -> WebResult<()> {
    let recipes = scope.subquery();
    let statements = [
        format!(
            "UPDATE photos SET deleted_at = ? WHERE deleted_at IS NULL AND stage_id IN (SELECT id FROM stages WHERE recipe_id IN ({}))",
            recipes
        ),
        format!(
            "UPDATE stages SET deleted_at = ? WHERE deleted_at IS NULL AND recipe_id IN ({})",
            recipes
        ),
        format!(
            "UPDATE recipe_ingredients SET deleted_at = ? WHERE deleted_at IS NULL AND recipe_id IN ({})",
            recipes
        ),
        format!(
            "UPDATE comments SET deleted_at = ? WHERE deleted_at IS NULL AND recipe_id IN ({})",
            recipes
        ),
        format!(
            "UPDATE recipes SET deleted_at = ? WHERE deleted_at IS NULL AND id IN ({})",
            recipes
        ),
    ];

    for sql in &statements {
        sqlx::query(sql)
            .bind(now)
            .bind(scope.key())
            .execute(&mut *conn)
            .await?;
    }

    debug!(?scope, "Recipes soft-deleted");
    Ok(())
}

const RECIPE_COLUMNS: &str = "r.id, r.user_id, r.name, r.servings, r.time, r.country, r.kind, r.cover, r.visible, r.created_at, r.updated_at";

fn recipe_from_row(row: &SqliteRow) -> Result<Recipe, sqlx::Error> {
    Ok(Recipe {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        servings: row.try_get("servings")?,
        time: row.try_get("time")?,
        country: row.try_get("country")?,
        kind: row.try_get("kind")?,
        cover: row.try_get("cover")?,
        visible: row.try_get("visible")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn recipes_from_rows(rows: &[SqliteRow]) -> Result<Vec<Recipe>, sqlx::Error> {
    rows.iter().map(recipe_from_row).collect()
}

impl Database {
    /// New recipes start empty and hidden
    pub async fn create_recipe(&self, user_id: i64) -> WebResult<i64> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO recipes (user_id, visible, created_at, updated_at) VALUES (?, 0, ?, ?)",
        )
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_recipe(&self, id: i64) -> WebResult<Option<Recipe>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM recipes r WHERE r.id = ? AND r.deleted_at IS NULL",
            RECIPE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(recipe_from_row).transpose()?)
    }

    /// Every live recipe of a user, hidden ones included
    pub async fn list_user_recipes(&self, user_id: i64) -> WebResult<Vec<Recipe>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM recipes r WHERE r.user_id = ? AND r.deleted_at IS NULL ORDER BY r.id DESC",
            RECIPE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes_from_rows(&rows)?)
    }

    /// Published recipes, newest first
    pub async fn list_visible_recipes(&self, page: Page) -> WebResult<Vec<Recipe>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM recipes r WHERE r.visible = 1 AND r.deleted_at IS NULL ORDER BY r.id DESC LIMIT ? OFFSET ?",
            RECIPE_COLUMNS
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes_from_rows(&rows)?)
    }

    /// Case-insensitive substring match on the name of published recipes
    ///
    /// SQLite `lower()` only folds ASCII, so both sides are folded in Rust.
    pub async fn search_visible_recipes(&self, text: &str, page: Page) -> WebResult<Vec<Recipe>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM recipes r WHERE r.visible = 1 AND r.deleted_at IS NULL AND instr(r.name_lower, ?) > 0 ORDER BY r.id DESC LIMIT ? OFFSET ?",
            RECIPE_COLUMNS
        ))
        .bind(text.to_lowercase())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes_from_rows(&rows)?)
    }

    /// Favorited recipes the user may still read
    pub async fn list_favorite_recipes(&self, user_id: i64) -> WebResult<Vec<Recipe>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM recipes r
            JOIN favorites f ON f.recipe_id = r.id
            WHERE f.user_id = ? AND r.deleted_at IS NULL AND (r.visible = 1 OR r.user_id = ?)
            ORDER BY f.created_at DESC, r.id DESC
            "#,
            RECIPE_COLUMNS
        ))
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes_from_rows(&rows)?)
    }

    pub async fn update_recipe(&self, id: i64, fields: &RecipeFields) -> WebResult<()> {
        sqlx::query(
            r#"
            UPDATE recipes SET name = ?, name_lower = ?, servings = ?, time = ?, country = ?, kind = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&fields.name)
        .bind(fields.name.to_lowercase())
        .bind(fields.servings)
        .bind(fields.time)
        .bind(&fields.country)
        .bind(&fields.kind)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_recipe_visibility(&self, id: i64, visible: bool) -> WebResult<()> {
        sqlx::query("UPDATE recipes SET visible = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(visible)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn set_recipe_cover(&self, id: i64, cover: &str) -> WebResult<()> {
        sqlx::query("UPDATE recipes SET cover = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(cover)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn soft_delete_recipe(&self, id: i64) -> WebResult<()> {
        let mut tx = self.pool.begin().await?;
        soft_delete_recipes(&mut tx, RecipeScope::One(id), Utc::now()).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Assemble the full view of a recipe the caller is allowed to read
    pub async fn recipe_details(&self, recipe: Recipe) -> WebResult<RecipeDetails> {
        // Authors can be soft-deleted only together with their recipes
        let author = self
            .find_user(recipe.user_id)
            .await?
            .map(|u| u.to_public())
            .unwrap_or_else(|| recipebook_core::PublicUser {
                id: recipe.user_id,
                username: String::new(),
                photo: String::new(),
            });

        let stages = self.list_stage_details(recipe.id).await?;
        let ingredients = self.list_recipe_ingredients(recipe.id).await?;
        let rating = self.average_rating(recipe.id).await?;
        let favorites = self.count_favorites(recipe.id).await?;

        Ok(RecipeDetails {
            recipe,
            author,
            stages,
            ingredients,
            rating,
            favorites,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_db;
    use super::*;

    async fn seeded() -> (Database, i64) {
        let db = test_db().await;
        let user = db.create_user("chef", "chef@example.com", "h").await.unwrap();
        (db, user)
    }

    async fn published(db: &Database, user: i64, name: &str) -> i64 {
        let id = db.create_recipe(user).await.unwrap();
        let fields = RecipeFields {
            name: name.to_string(),
            ..Default::default()
        };
        db.update_recipe(id, &fields).await.unwrap();
        db.set_recipe_visibility(id, true).await.unwrap();
        id
    }

    #[test]
    fn test_page_clamping() {
        assert_eq!(Page::new(None, None), Page { limit: 50, offset: 0 });
        assert_eq!(Page::new(Some(1000), Some(-5)), Page { limit: 100, offset: 0 });
        assert_eq!(Page::new(Some(0), Some(3)).limit, 1);
    }

    #[tokio::test]
    async fn test_new_recipe_is_hidden_and_empty() {
        let (db, user) = seeded().await;
        let id = db.create_recipe(user).await.unwrap();

        let recipe = db.find_recipe(id).await.unwrap().unwrap();
        assert!(!recipe.visible);
        assert!(recipe.name.is_empty());
        assert!(db.list_visible_recipes(Page::default()).await.unwrap().is_empty());
        assert_eq!(db.list_user_recipes(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_skips_hidden() {
        let (db, user) = seeded().await;
        published(&db, user, "Chicken Soup").await;
        published(&db, user, "Apple pie").await;
        let hidden = db.create_recipe(user).await.unwrap();
        db.update_recipe(
            hidden,
            &RecipeFields {
                name: "Secret soup".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let found = db
            .search_visible_recipes("SOUP", Page::default())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Chicken Soup");
    }

    #[tokio::test]
    async fn test_search_folds_cyrillic_case() {
        let (db, user) = seeded().await;
        published(&db, user, "Борщ").await;
        published(&db, user, "Щи").await;

        for text in ["БОРЩ", "борщ", "орщ"] {
            let found = db.search_visible_recipes(text, Page::default()).await.unwrap();
            assert_eq!(found.len(), 1, "searching {}", text);
            assert_eq!(found[0].name, "Борщ");
        }
    }

    #[tokio::test]
    async fn test_listing_is_newest_first_and_paged() {
        let (db, user) = seeded().await;
        let first = published(&db, user, "one").await;
        let second = published(&db, user, "two").await;

        let all = db.list_visible_recipes(Page::default()).await.unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![second, first]);

        let page = db
            .list_visible_recipes(Page::new(Some(1), Some(1)))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, first);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_children() {
        let (db, user) = seeded().await;
        let other = db.create_user("guest", "guest@example.com", "h").await.unwrap();
        let recipe = published(&db, user, "Stew").await;
        let stage = db.create_stage(recipe, "Chop").await.unwrap();
        db.add_stage_photo(stage, "abc.png").await.unwrap();
        db.create_comment(recipe, other, "Tasty", 4).await.unwrap();

        db.soft_delete_recipe(recipe).await.unwrap();

        assert!(db.find_recipe(recipe).await.unwrap().is_none());
        assert!(db.find_stage(stage).await.unwrap().is_none());
        assert!(db.list_stage_details(recipe).await.unwrap().is_empty());
        assert!(db.list_comments(recipe).await.unwrap().is_empty());
    }
}

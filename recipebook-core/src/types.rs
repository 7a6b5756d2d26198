//! Domain entities
//!
//! Rows are soft-deleted, so `deleted_at` never leaves the persistence layer
//! and is not part of these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::{Owned, Visible};

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub rights: i64,
    /// Stored file name, empty when unset
    pub photo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            photo: self.photo.clone(),
        }
    }
}

impl Owned for User {
    fn owner_id(&self) -> i64 {
        self.id
    }

    fn resource_kind(&self) -> &'static str {
        "user"
    }
}

/// What other users may see about an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub photo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Recipe {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub servings: i64,
    /// Cooking time in minutes
    pub time: i64,
    pub country: String,
    /// Dish type (soup, dessert, ...)
    pub kind: String,
    pub cover: String,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Recipe {
    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn resource_kind(&self) -> &'static str {
        "recipe"
    }
}

impl Visible for Recipe {
    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Editable recipe fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecipeFields {
    pub name: String,
    #[serde(default)]
    pub servings: i64,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Stage {
    pub id: i64,
    pub recipe_id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Photo {
    pub id: i64,
    pub stage_id: i64,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// Catalog entry, nutrition values per 100 g
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub created_at: DateTime<Utc>,
}

/// New catalog entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewIngredient {
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub proteins: f64,
    #[serde(default)]
    pub fats: f64,
    #[serde(default)]
    pub carbohydrates: f64,
}

impl NewIngredient {
    pub fn has_negative_values(&self) -> bool {
        [self.calories, self.proteins, self.fats, self.carbohydrates]
            .iter()
            .any(|v| *v < 0.0 || v.is_nan())
    }
}

/// Ingredient attached to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub name: String,
    pub quantity: f64,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Comment {
    pub id: i64,
    pub recipe_id: i64,
    pub user_id: i64,
    /// Author's username at read time
    pub username: String,
    pub text: String,
    pub rate: i64,
    pub created_at: DateTime<Utc>,
}

impl Owned for Comment {
    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn resource_kind(&self) -> &'static str {
        "comment"
    }
}

/// Comments carry no flag of their own; readers reach them through a
/// recipe that has already passed the visibility gate.
impl Visible for Comment {
    fn is_visible(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StageDetails {
    #[serde(flatten)]
    pub stage: Stage,
    pub photos: Vec<Photo>,
}

/// Recipe with everything hanging off it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecipeDetails {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub author: PublicUser,
    pub stages: Vec<StageDetails>,
    pub ingredients: Vec<RecipeIngredient>,
    /// Mean comment rating, absent without comments
    pub rating: Option<f64>,
    pub favorites: i64,
}

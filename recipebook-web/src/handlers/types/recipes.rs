//! Recipe, stage and comment endpoint types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::Page;

/// Listing window
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// At most 100, defaults to 50
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        Page::new(query.limit, query.offset)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring of the recipe name, case-insensitive
    #[serde(default)]
    pub text: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VisibilityRequest {
    pub visible: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct StageRequest {
    #[schema(example = "Bring the water to a boil")]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddIngredientRequest {
    pub ingredient_id: i64,
    /// Grams, must be positive
    #[schema(example = 250.0)]
    pub quantity: f64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CommentRequest {
    pub text: String,
    /// 0 to 5
    #[schema(example = 5)]
    pub rate: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CoverResponse {
    pub message: String,
    pub cover: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StagePhotoResponse {
    pub message: String,
    pub id: i64,
    pub photo: String,
}

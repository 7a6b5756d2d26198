//! HTTP request handlers for the Recipe Book API
//!
//! Account handlers live next to the extractors in `crate::auth`.

pub mod assets;
pub mod comments;
pub mod health;
pub mod ingredients;
pub mod my_recipes;
pub mod recipes;
pub mod stages;
pub mod types;

pub use assets::*;
pub use comments::*;
pub use health::*;
pub use ingredients::*;
pub use my_recipes::*;
pub use recipes::*;
pub use stages::*;

pub use types::*;

use crate::{AppState, WebResult};
use recipebook_core::{not_found_error, Recipe};

/// Live recipe by id, or 404
pub(crate) async fn load_recipe(state: &AppState, id: i64) -> WebResult<Recipe> {
    state
        .db
        .find_recipe(id)
        .await?
        .ok_or_else(|| not_found_error!("Recipe", "recipes").into())
}

pub mod postgres;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Lookup, NewRecipe, RecipeFilter, RecipeRecord};

pub use postgres::PostgresRecipeRepository;

/// Data access contract for the recipe catalog.
///
/// Implementations issue parameterized queries against the store and map rows
/// to plain records. Absent filter fields must impose no constraint on the
/// result set. "No matching row" is an absent value, never an error; errors
/// are reserved for store failures.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Fetch one recipe by id, joined with its category and variant names.
    async fn fetch_recipe(&self, id: i32) -> Result<Option<RecipeRecord>>;

    /// Fetch one page of recipes matching the filter, ordered by id.
    async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeRecord>>;

    /// Count all recipes matching the filter.
    async fn count_recipes(&self, filter: &RecipeFilter) -> Result<i64>;

    /// Uniformly pick one recipe from the filtered set.
    async fn random_recipe(&self, filter: &RecipeFilter) -> Result<Option<RecipeRecord>>;

    /// Insert a new recipe and return its assigned id.
    async fn insert_recipe(&self, recipe: &NewRecipe) -> Result<i32>;

    /// Replace every field of an existing recipe. Returns false when no row
    /// has the given id.
    async fn replace_recipe(&self, id: i32, recipe: &NewRecipe) -> Result<bool>;

    /// Delete a recipe. Returns false when no row has the given id.
    async fn delete_recipe(&self, id: i32) -> Result<bool>;

    /// All categories, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Lookup>>;

    /// All variants, ordered by name.
    async fn list_variants(&self) -> Result<Vec<Lookup>>;
}

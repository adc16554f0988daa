use std::fmt;
use std::sync::Arc;

use crate::error::{RecipeError, Result};
use crate::model::{
    Lookup, NewRecipe, PageMeta, Recipe, RecipeDraft, RecipeFilter, RecipeFilterParams, RecipePage,
    SkillLevel,
};
use crate::repository::RecipeRepository;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

/// Domain service for the recipe catalog. Validates input, computes
/// pagination, and keeps the error taxonomy intact on the way up.
#[derive(Clone)]
pub struct RecipeService {
    repo: Arc<dyn RecipeRepository>,
}

impl fmt::Debug for RecipeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeService")
            .field("repo", &Arc::strong_count(&self.repo))
            .finish()
    }
}

impl RecipeService {
    pub fn new(repo: Arc<dyn RecipeRepository>) -> Self {
        Self { repo }
    }

    /// One page of recipes matching the filter set, plus pagination metadata.
    ///
    /// Out-of-range paging falls back to defaults rather than failing: the
    /// HTTP layer already rejects explicit bad values, and this keeps the
    /// service safe to call from any other entry point.
    pub async fn list_recipes(
        &self,
        params: RecipeFilterParams,
        page: i64,
        per_page: i64,
    ) -> Result<RecipePage> {
        let page = if page < 1 { DEFAULT_PAGE } else { page };
        let per_page = if per_page < 1 || per_page > MAX_PER_PAGE {
            DEFAULT_PER_PAGE
        } else {
            per_page
        };

        let filter = Self::validate_filter(&params)?;
        // Saturating keeps absurd page numbers from wrapping into a negative
        // store offset.
        let offset = page.saturating_sub(1).saturating_mul(per_page);

        let total = self.repo.count_recipes(&filter).await?;
        let records = self.repo.list_recipes(&filter, per_page, offset).await?;

        let mut total_pages = total / per_page;
        if total % per_page > 0 {
            total_pages += 1;
        }

        Ok(RecipePage {
            data: records.into_iter().map(Recipe::from).collect(),
            meta: PageMeta {
                total,
                page,
                per_page,
                total_pages,
            },
        })
    }

    pub async fn get_recipe(&self, id: i32) -> Result<Recipe> {
        if id < 1 {
            return Err(RecipeError::InvalidParams("invalid recipe ID".to_string()));
        }

        let record = self.repo.fetch_recipe(id).await?;
        let Some(record) = record else {
            return Err(RecipeError::NotFound("recipe not found".to_string()));
        };

        Ok(record.into())
    }

    /// Spin the wheel: uniformly pick one recipe from the filtered set.
    ///
    /// An empty filtered set is not-found; a store failure stays internal so
    /// an outage is never mistaken for an empty catalog.
    pub async fn random_recipe(&self, params: RecipeFilterParams) -> Result<Recipe> {
        let filter = Self::validate_filter(&params)?;

        let record = self.repo.random_recipe(&filter).await?;
        let Some(record) = record else {
            return Err(RecipeError::NotFound(
                "no recipes match the criteria".to_string(),
            ));
        };

        Ok(record.into())
    }

    /// Insert a recipe, then re-fetch it by the assigned id so the response
    /// carries the denormalized category and variant names.
    pub async fn create_recipe(&self, draft: RecipeDraft) -> Result<Recipe> {
        let recipe = Self::validate_draft(draft)?;
        let id = self.repo.insert_recipe(&recipe).await?;
        self.fetch_stored(id).await
    }

    pub async fn update_recipe(&self, id: i32, draft: RecipeDraft) -> Result<Recipe> {
        if id < 1 {
            return Err(RecipeError::InvalidParams("invalid recipe ID".to_string()));
        }

        let recipe = Self::validate_draft(draft)?;
        let replaced = self.repo.replace_recipe(id, &recipe).await?;
        if !replaced {
            return Err(RecipeError::NotFound("recipe not found".to_string()));
        }

        self.fetch_stored(id).await
    }

    pub async fn delete_recipe(&self, id: i32) -> Result<()> {
        if id < 1 {
            return Err(RecipeError::InvalidParams("invalid recipe ID".to_string()));
        }

        let deleted = self.repo.delete_recipe(id).await?;
        if !deleted {
            return Err(RecipeError::NotFound("recipe not found".to_string()));
        }

        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<Lookup>> {
        self.repo.list_categories().await
    }

    pub async fn list_variants(&self) -> Result<Vec<Lookup>> {
        self.repo.list_variants().await
    }

    /// A row we just wrote must exist; its absence is a store-level problem,
    /// not a caller error.
    async fn fetch_stored(&self, id: i32) -> Result<Recipe> {
        let record = self.repo.fetch_recipe(id).await?;
        let Some(record) = record else {
            return Err(RecipeError::Internal(format!(
                "Recipe {id} missing after write"
            )));
        };
        Ok(record.into())
    }

    /// Turn raw filter input into a typed filter, rejecting unknown skill
    /// levels. Empty search text is treated as absent.
    pub fn validate_filter(params: &RecipeFilterParams) -> Result<RecipeFilter> {
        let skill_level = params
            .skill_level
            .as_deref()
            .map(str::parse::<SkillLevel>)
            .transpose()?;

        Ok(RecipeFilter {
            search: params.search.clone().filter(|s| !s.is_empty()),
            skill_level,
            variant_id: params.variant_id,
            category_id: params.category_id,
            max_cooking_time: params.max_cooking_time,
        })
    }

    /// Full-record write validation: required text non-empty, numerics
    /// non-negative, lookup references positive, skill level recognized.
    pub fn validate_draft(draft: RecipeDraft) -> Result<NewRecipe> {
        if draft.title.trim().is_empty() {
            return Err(RecipeError::InvalidParams(
                "title cannot be empty".to_string(),
            ));
        }
        if draft.description.trim().is_empty() {
            return Err(RecipeError::InvalidParams(
                "description cannot be empty".to_string(),
            ));
        }
        if draft.ingredients.trim().is_empty() {
            return Err(RecipeError::InvalidParams(
                "ingredients cannot be empty".to_string(),
            ));
        }
        if draft.instructions.trim().is_empty() {
            return Err(RecipeError::InvalidParams(
                "instructions cannot be empty".to_string(),
            ));
        }
        if draft.cooking_time < 0 {
            return Err(RecipeError::InvalidParams(
                "cooking_time cannot be negative".to_string(),
            ));
        }
        if draft.servings < 0 {
            return Err(RecipeError::InvalidParams(
                "servings cannot be negative".to_string(),
            ));
        }
        if draft.category_id < 1 {
            return Err(RecipeError::InvalidParams(
                "invalid category_id".to_string(),
            ));
        }
        if draft.variant_id < 1 {
            return Err(RecipeError::InvalidParams("invalid variant_id".to_string()));
        }

        let skill_level = draft.skill_level.parse::<SkillLevel>()?;

        Ok(NewRecipe {
            title: draft.title,
            description: draft.description,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
            cooking_time: draft.cooking_time,
            skill_level,
            category_id: draft.category_id,
            variant_id: draft.variant_id,
            image_url: draft.image_url.filter(|url| !url.is_empty()),
            servings: draft.servings,
        })
    }
}

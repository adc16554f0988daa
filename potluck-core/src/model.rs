use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecipeError;

/// Recipe difficulty. Stored as lowercase text, constrained by a CHECK in the
/// schema, and validated here before any query is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn all() -> &'static [SkillLevel] {
        use SkillLevel::*;
        &[Beginner, Intermediate, Advanced]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            other => Err(RecipeError::InvalidParams(format!(
                "invalid skill_level: {other}"
            ))),
        }
    }
}

/// API-facing recipe record, exactly as it serializes onto the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub cooking_time: i32,
    pub skill_level: SkillLevel,
    pub category_id: i32,
    pub category_name: String,
    pub variant_id: i32,
    pub variant_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub servings: i32,
}

/// Row record produced by the data layer: the recipe columns joined with the
/// denormalized category and variant names.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub cooking_time: i32,
    pub skill_level: SkillLevel,
    pub category_id: i32,
    pub category_name: String,
    pub variant_id: i32,
    pub variant_name: String,
    pub image_url: Option<String>,
    pub servings: i32,
}

impl From<RecipeRecord> for Recipe {
    fn from(record: RecipeRecord) -> Self {
        Recipe {
            id: record.id,
            title: record.title,
            description: record.description,
            ingredients: record.ingredients,
            instructions: record.instructions,
            cooking_time: record.cooking_time,
            skill_level: record.skill_level,
            category_id: record.category_id,
            category_name: record.category_name,
            variant_id: record.variant_id,
            variant_name: record.variant_name,
            image_url: record.image_url,
            servings: record.servings,
        }
    }
}

/// Category or variant row. Read-only lookups referenced by recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lookup {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Raw filter input as it arrives from a query string or spin body. The
/// skill level is still free text at this point; [`crate::service`] validates
/// it into a [`RecipeFilter`] before the data layer sees it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeFilterParams {
    pub search: Option<String>,
    pub skill_level: Option<String>,
    pub variant_id: Option<i32>,
    pub category_id: Option<i32>,
    pub max_cooking_time: Option<i32>,
}

/// Validated filter set handed to the data layer. Every field is optional;
/// absent fields impose no constraint on the query.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub search: Option<String>,
    pub skill_level: Option<SkillLevel>,
    pub variant_id: Option<i32>,
    pub category_id: Option<i32>,
    pub max_cooking_time: Option<i32>,
}

/// Raw create/update payload. Validated by the service into a [`NewRecipe`].
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub cooking_time: i32,
    pub skill_level: String,
    pub category_id: i32,
    pub variant_id: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    pub servings: i32,
}

/// Validated full-record write payload for insert and replace.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub cooking_time: i32,
    pub skill_level: SkillLevel,
    pub category_id: i32,
    pub variant_id: i32,
    pub image_url: Option<String>,
    pub servings: i32,
}

/// Pagination metadata returned alongside a recipe page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

/// One page of recipes plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipePage {
    pub data: Vec<Recipe>,
    pub meta: PageMeta,
}

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::error::{RecipeError, Result};
use crate::model::{Lookup, NewRecipe, RecipeFilter, RecipeRecord, SkillLevel};
use crate::repository::RecipeRepository;

/// Shared projection for every recipe read. The denormalized category and
/// variant names ride along so no second query is needed.
const RECIPE_SELECT: &str = "SELECT r.id, r.title, r.description, r.ingredients, r.instructions, \
     r.cooking_time, r.skill_level, r.category_id, c.name AS category_name, \
     r.variant_id, v.name AS variant_name, r.image_url, r.servings \
     FROM recipes r \
     JOIN categories c ON c.id = r.category_id \
     JOIN variants v ON v.id = r.variant_id";

/// Count over the same filterable columns. Search only touches recipe
/// columns, so the joins are not needed here.
const RECIPE_COUNT: &str = "SELECT COUNT(*) FROM recipes r";

const INSERT_RECIPE: &str = "INSERT INTO recipes \
     (title, description, ingredients, instructions, cooking_time, skill_level, \
      category_id, variant_id, image_url, servings) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
     RETURNING id";

const UPDATE_RECIPE: &str = "UPDATE recipes SET \
     title = $1, description = $2, ingredients = $3, instructions = $4, \
     cooking_time = $5, skill_level = $6, category_id = $7, variant_id = $8, \
     image_url = $9, servings = $10, updated_at = NOW() \
     WHERE id = $11";

const DELETE_RECIPE: &str = "DELETE FROM recipes WHERE id = $1";

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: i32,
    title: String,
    description: String,
    ingredients: String,
    instructions: String,
    cooking_time: i32,
    skill_level: String,
    category_id: i32,
    category_name: String,
    variant_id: i32,
    variant_name: String,
    image_url: Option<String>,
    servings: i32,
}

impl TryFrom<RecipeRow> for RecipeRecord {
    type Error = RecipeError;

    fn try_from(row: RecipeRow) -> Result<Self> {
        // The schema CHECK keeps this from ever failing in practice; a row
        // that slips through anyway is store corruption, not caller input.
        let skill_level: SkillLevel = row.skill_level.parse().map_err(|_| {
            RecipeError::Internal(format!(
                "Unexpected skill level in store: {}",
                row.skill_level
            ))
        })?;

        Ok(RecipeRecord {
            id: row.id,
            title: row.title,
            description: row.description,
            ingredients: row.ingredients,
            instructions: row.instructions,
            cooking_time: row.cooking_time,
            skill_level,
            category_id: row.category_id,
            category_name: row.category_name,
            variant_id: row.variant_id,
            variant_name: row.variant_name,
            image_url: row.image_url,
            servings: row.servings,
        })
    }
}

#[derive(Debug, FromRow)]
struct LookupRow {
    id: i32,
    name: String,
    description: Option<String>,
}

impl From<LookupRow> for Lookup {
    fn from(row: LookupRow) -> Self {
        Lookup {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

/// Append one predicate per present filter. Absent filters append nothing,
/// which is what makes them impose no constraint: the guard lives in this
/// assembly instead of in SQL null-comparison semantics.
fn push_filter_clauses(qb: &mut QueryBuilder<'static, Postgres>, filter: &RecipeFilter) {
    if let Some(search) = filter.search.as_ref() {
        let like = format!("%{}%", search);
        qb.push(" AND (r.title ILIKE ");
        qb.push_bind(like.clone());
        qb.push(" OR r.description ILIKE ");
        qb.push_bind(like);
        qb.push(")");
    }

    if let Some(skill_level) = filter.skill_level {
        qb.push(" AND r.skill_level = ");
        qb.push_bind(skill_level.as_str());
    }

    if let Some(variant_id) = filter.variant_id {
        qb.push(" AND r.variant_id = ");
        qb.push_bind(variant_id);
    }

    if let Some(category_id) = filter.category_id {
        qb.push(" AND r.category_id = ");
        qb.push_bind(category_id);
    }

    if let Some(max_cooking_time) = filter.max_cooking_time {
        qb.push(" AND r.cooking_time <= ");
        qb.push_bind(max_cooking_time);
    }
}

fn recipe_page_query(
    filter: &RecipeFilter,
    limit: i64,
    offset: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(RECIPE_SELECT);
    qb.push(" WHERE TRUE");
    push_filter_clauses(&mut qb, filter);
    // Stable ordering keeps pages consistent under concurrent writes.
    qb.push(" ORDER BY r.id");
    qb.push(" LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    qb
}

fn recipe_count_query(filter: &RecipeFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(RECIPE_COUNT);
    qb.push(" WHERE TRUE");
    push_filter_clauses(&mut qb, filter);
    qb
}

fn random_recipe_query(filter: &RecipeFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(RECIPE_SELECT);
    qb.push(" WHERE TRUE");
    push_filter_clauses(&mut qb, filter);
    qb.push(" ORDER BY RANDOM() LIMIT 1");
    qb
}

/// Postgres-backed recipe store. The pool is the only state; every call is a
/// single round trip.
#[derive(Debug, Clone)]
pub struct PostgresRecipeRepository {
    pool: PgPool,
}

impl PostgresRecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeRepository for PostgresRecipeRepository {
    async fn fetch_recipe(&self, id: i32) -> Result<Option<RecipeRecord>> {
        let sql = format!("{RECIPE_SELECT} WHERE r.id = $1");
        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RecipeError::Internal(format!("Database query failed: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(RecipeRecord::try_from(row)?))
    }

    async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeRecord>> {
        let mut qb = recipe_page_query(filter, limit, offset);
        let rows = qb
            .build_query_as::<RecipeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RecipeError::Internal(format!("Database query failed: {}", e)))?;

        rows.into_iter().map(RecipeRecord::try_from).collect()
    }

    async fn count_recipes(&self, filter: &RecipeFilter) -> Result<i64> {
        let mut qb = recipe_count_query(filter);
        let total = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RecipeError::Internal(format!("Database query failed: {}", e)))?;

        Ok(total)
    }

    async fn random_recipe(&self, filter: &RecipeFilter) -> Result<Option<RecipeRecord>> {
        let mut qb = random_recipe_query(filter);
        let row = qb
            .build_query_as::<RecipeRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RecipeError::Internal(format!("Database query failed: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(RecipeRecord::try_from(row)?))
    }

    async fn insert_recipe(&self, recipe: &NewRecipe) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(INSERT_RECIPE)
            .bind(&recipe.title)
            .bind(&recipe.description)
            .bind(&recipe.ingredients)
            .bind(&recipe.instructions)
            .bind(recipe.cooking_time)
            .bind(recipe.skill_level.as_str())
            .bind(recipe.category_id)
            .bind(recipe.variant_id)
            .bind(&recipe.image_url)
            .bind(recipe.servings)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RecipeError::Internal(format!("Failed to insert recipe: {}", e)))?;

        Ok(id)
    }

    async fn replace_recipe(&self, id: i32, recipe: &NewRecipe) -> Result<bool> {
        let result = sqlx::query(UPDATE_RECIPE)
            .bind(&recipe.title)
            .bind(&recipe.description)
            .bind(&recipe.ingredients)
            .bind(&recipe.instructions)
            .bind(recipe.cooking_time)
            .bind(recipe.skill_level.as_str())
            .bind(recipe.category_id)
            .bind(recipe.variant_id)
            .bind(&recipe.image_url)
            .bind(recipe.servings)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RecipeError::Internal(format!("Update failed: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_recipe(&self, id: i32) -> Result<bool> {
        let result = sqlx::query(DELETE_RECIPE)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RecipeError::Internal(format!("Delete failed: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_categories(&self) -> Result<Vec<Lookup>> {
        let rows = sqlx::query_as::<_, LookupRow>(
            "SELECT id, name, description FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RecipeError::Internal(format!("Database query failed: {}", e)))?;

        Ok(rows.into_iter().map(Lookup::from).collect())
    }

    async fn list_variants(&self) -> Result<Vec<Lookup>> {
        let rows = sqlx::query_as::<_, LookupRow>(
            "SELECT id, name, description FROM variants ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RecipeError::Internal(format!("Database query failed: {}", e)))?;

        Ok(rows.into_iter().map(Lookup::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_add_no_predicates() {
        let filter = RecipeFilter::default();
        let qb = recipe_count_query(&filter);
        assert_eq!(qb.sql(), format!("{RECIPE_COUNT} WHERE TRUE"));
    }

    #[test]
    fn search_filter_matches_title_or_description() {
        let filter = RecipeFilter {
            search: Some("soup".to_string()),
            ..Default::default()
        };
        let qb = recipe_page_query(&filter, 10, 0);
        let sql = qb.sql();
        assert!(sql.contains("r.title ILIKE "));
        assert!(sql.contains(" OR r.description ILIKE "));
    }

    #[test]
    fn each_present_filter_appends_its_predicate() {
        let filter = RecipeFilter {
            search: Some("noodle".to_string()),
            skill_level: Some(SkillLevel::Advanced),
            variant_id: Some(4),
            category_id: Some(2),
            max_cooking_time: Some(45),
        };
        let qb = recipe_page_query(&filter, 10, 0);
        let sql = qb.sql();
        assert!(sql.contains("r.skill_level = "));
        assert!(sql.contains("r.variant_id = "));
        assert!(sql.contains("r.category_id = "));
        assert!(sql.contains("r.cooking_time <= "));
    }

    #[test]
    fn absent_filters_leave_no_trace() {
        let filter = RecipeFilter {
            category_id: Some(7),
            ..Default::default()
        };
        let qb = recipe_count_query(&filter);
        let sql = qb.sql();
        assert!(sql.contains("r.category_id = "));
        assert!(!sql.contains("r.skill_level"));
        assert!(!sql.contains("r.variant_id"));
        assert!(!sql.contains("r.cooking_time"));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn count_and_page_share_filter_clauses() {
        let filter = RecipeFilter {
            skill_level: Some(SkillLevel::Beginner),
            max_cooking_time: Some(30),
            ..Default::default()
        };
        let page_sql = recipe_page_query(&filter, 10, 0).sql().to_string();
        let count_sql = recipe_count_query(&filter).sql().to_string();

        let page_clauses = page_sql
            .split(" WHERE TRUE")
            .nth(1)
            .and_then(|rest| rest.split(" ORDER BY").next())
            .expect("page query has a WHERE section");
        let count_clauses = count_sql
            .split(" WHERE TRUE")
            .nth(1)
            .expect("count query has a WHERE section");
        assert_eq!(page_clauses, count_clauses);
    }

    #[test]
    fn page_query_orders_by_id_with_limit_and_offset() {
        let qb = recipe_page_query(&RecipeFilter::default(), 25, 50);
        let sql = qb.sql();
        assert!(sql.contains(" ORDER BY r.id"));
        assert!(sql.contains(" LIMIT "));
        assert!(sql.contains(" OFFSET "));
    }

    #[test]
    fn random_query_orders_randomly_and_takes_one() {
        let qb = random_recipe_query(&RecipeFilter::default());
        assert!(qb.sql().ends_with(" ORDER BY RANDOM() LIMIT 1"));
    }
}

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use potluck_core::{
    Lookup, NewRecipe, RecipeFilter, RecipeRecord, RecipeRepository, RecipeService,
    Result, SkillLevel,
};
use potluck_server::{
    AppState,
    config::{Config, CorsConfig, DatabaseConfig, ServerConfig},
    create_app,
};

/// In-memory stand-in for the Postgres store, preloaded with the lookup rows
/// the seed migration would provide. Ids are assigned sequentially the way
/// SERIAL does.
#[derive(Debug)]
pub struct MemoryRepository {
    recipes: Mutex<Vec<RecipeRecord>>,
    categories: Vec<Lookup>,
    variants: Vec<Lookup>,
}

impl MemoryRepository {
    pub fn seeded() -> Self {
        Self {
            recipes: Mutex::new(Vec::new()),
            categories: vec![
                lookup(1, "Breakfast", Some("Morning dishes")),
                lookup(2, "Main Course", None),
                lookup(3, "Dessert", None),
            ],
            variants: vec![
                lookup(1, "Classic", None),
                lookup(2, "Vegetarian", Some("No meat or fish")),
                lookup(3, "Vegan", None),
            ],
        }
    }

    /// Push a prebuilt row, bypassing service validation.
    #[allow(unused)]
    pub fn insert_record(&self, record: RecipeRecord) {
        self.recipes.lock().unwrap().push(record);
    }

    fn materialize(&self, id: i32, recipe: &NewRecipe) -> RecipeRecord {
        RecipeRecord {
            id,
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            cooking_time: recipe.cooking_time,
            skill_level: recipe.skill_level,
            category_id: recipe.category_id,
            category_name: name_of(&self.categories, recipe.category_id),
            variant_id: recipe.variant_id,
            variant_name: name_of(&self.variants, recipe.variant_id),
            image_url: recipe.image_url.clone(),
            servings: recipe.servings,
        }
    }
}

#[async_trait]
impl RecipeRepository for MemoryRepository {
    async fn fetch_recipe(&self, id: i32) -> Result<Option<RecipeRecord>> {
        let rows = self.recipes.lock().unwrap();
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeRecord>> {
        let rows = self.recipes.lock().unwrap();
        let mut matching: Vec<RecipeRecord> = rows
            .iter()
            .filter(|row| matches(filter, row))
            .cloned()
            .collect();
        matching.sort_by_key(|row| row.id);
        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_recipes(&self, filter: &RecipeFilter) -> Result<i64> {
        let rows = self.recipes.lock().unwrap();
        Ok(rows.iter().filter(|row| matches(filter, row)).count() as i64)
    }

    async fn random_recipe(&self, filter: &RecipeFilter) -> Result<Option<RecipeRecord>> {
        // Lowest matching id, so spin assertions stay deterministic.
        let rows = self.recipes.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|row| matches(filter, row))
            .min_by_key(|row| row.id)
            .cloned())
    }

    async fn insert_recipe(&self, recipe: &NewRecipe) -> Result<i32> {
        let mut rows = self.recipes.lock().unwrap();
        let id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        let record = self.materialize(id, recipe);
        rows.push(record);
        Ok(id)
    }

    async fn replace_recipe(&self, id: i32, recipe: &NewRecipe) -> Result<bool> {
        let record = self.materialize(id, recipe);
        let mut rows = self.recipes.lock().unwrap();
        match rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                *row = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_recipe(&self, id: i32) -> Result<bool> {
        let mut rows = self.recipes.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() < before)
    }

    async fn list_categories(&self) -> Result<Vec<Lookup>> {
        Ok(sorted_by_name(&self.categories))
    }

    async fn list_variants(&self) -> Result<Vec<Lookup>> {
        Ok(sorted_by_name(&self.variants))
    }
}

fn lookup(id: i32, name: &str, description: Option<&str>) -> Lookup {
    Lookup {
        id,
        name: name.to_string(),
        description: description.map(str::to_string),
    }
}

fn name_of(table: &[Lookup], id: i32) -> String {
    table
        .iter()
        .find(|row| row.id == id)
        .map(|row| row.name.clone())
        .unwrap_or_else(|| format!("#{id}"))
}

fn sorted_by_name(table: &[Lookup]) -> Vec<Lookup> {
    let mut rows = table.to_vec();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

fn matches(filter: &RecipeFilter, record: &RecipeRecord) -> bool {
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        if !record.title.to_lowercase().contains(&needle)
            && !record.description.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    if filter
        .skill_level
        .is_some_and(|skill| skill != record.skill_level)
    {
        return false;
    }
    if filter.variant_id.is_some_and(|id| id != record.variant_id) {
        return false;
    }
    if filter.category_id.is_some_and(|id| id != record.category_id) {
        return false;
    }
    if filter
        .max_cooking_time
        .is_some_and(|max| record.cooking_time > max)
    {
        return false;
    }
    true
}

/// A complete beginner-level breakfast row pointing at the seeded lookups.
#[allow(unused)]
pub fn sample_record(id: i32, title: &str) -> RecipeRecord {
    RecipeRecord {
        id,
        title: title.to_string(),
        description: format!("{title} for hungry mornings"),
        ingredients: "eggs, butter, salt".to_string(),
        instructions: "Mix everything and cook until done".to_string(),
        cooking_time: 30,
        skill_level: SkillLevel::Beginner,
        category_id: 1,
        category_name: "Breakfast".to_string(),
        variant_id: 1,
        variant_name: "Classic".to_string(),
        image_url: None,
        servings: 2,
    }
}

pub fn build_test_server() -> (TestServer, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::seeded());
    let recipes = Arc::new(RecipeService::new(
        Arc::clone(&repository) as Arc<dyn RecipeRepository>
    ));
    let state = AppState::new(recipes, Arc::new(test_config()));
    let server =
        TestServer::new(create_app(state)).expect("failed to start test server");
    (server, repository)
}

fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://postgres@localhost:5432/potluck_test".to_string(),
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
    }
}

use std::{fmt, sync::Arc};

use potluck_core::RecipeService;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<RecipeService>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(recipes: Arc<RecipeService>, config: Arc<Config>) -> Self {
        Self { recipes, config }
    }
}

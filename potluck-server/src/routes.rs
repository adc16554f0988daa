//! Route table for the recipe catalog API.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::{lookups, recipes};
use crate::state::AppState;

/// Everything under `/api`.
pub fn create_api_router() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/recipes/{id}",
            get(recipes::get_recipe)
                .put(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route("/spin", post(recipes::spin))
        .route("/categories", get(lookups::list_categories))
        .route("/variants", get(lookups::list_variants))
}

//! # Potluck Core
//!
//! Domain library for the Potluck recipe catalog, providing the typed recipe
//! model, the store abstraction with its Postgres implementation, and the
//! service layer behind the HTTP API.
//!
//! ## Overview
//!
//! - **Recipe Model**: recipes with skill levels, category and variant
//!   references, filters, and pagination metadata
//! - **Store Abstraction**: trait-based recipe store with a sqlx/Postgres
//!   implementation built on dynamic query assembly
//! - **Domain Service**: input validation, page clamping, and the wheel spin
//!   (uniform random pick from a filtered set)
//! - **Migrations**: schema and lookup seed data embedded at compile time
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use potluck_core::{PostgresRecipeRepository, RecipeService, database};
//!
//! async fn bootstrap(database_url: &str) -> potluck_core::Result<RecipeService> {
//!     let pool = database::connect(database_url).await?;
//!     database::run_migrations(&pool).await?;
//!     let repo = Arc::new(PostgresRecipeRepository::new(pool));
//!     Ok(RecipeService::new(repo))
//! }
//! ```

/// Connection pool setup and migration runner
pub mod database;

/// Error types shared across the catalog
pub mod error;

/// Recipe, filter, and pagination types
pub mod model;

/// Recipe store trait and Postgres implementation
pub mod repository;

/// Domain service: validation, pagination, wheel spin
pub mod service;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{RecipeError, Result};
pub use model::{
    Lookup, NewRecipe, PageMeta, Recipe, RecipeDraft, RecipeFilter, RecipeFilterParams,
    RecipePage, RecipeRecord, SkillLevel,
};
pub use repository::{PostgresRecipeRepository, RecipeRepository};
pub use service::RecipeService;

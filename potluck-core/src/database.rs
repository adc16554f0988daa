use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::error::{RecipeError, Result};

const MAX_CONNECTIONS: u32 = 25;
const MIN_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Open a Postgres pool sized for a small API workload.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(MIN_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .connect(database_url)
        .await
        .map_err(|e| RecipeError::Internal(format!("Database connection failed: {}", e)))?;

    info!(
        "Database pool initialized with max_connections={}, min_connections={}",
        MAX_CONNECTIONS, MIN_CONNECTIONS
    );

    Ok(pool)
}

/// Apply any pending schema migrations embedded in this crate.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    crate::MIGRATOR
        .run(pool)
        .await
        .map_err(|e| RecipeError::Internal(format!("Migration failed: {}", e)))?;

    info!("Database migrations up to date");
    Ok(())
}

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::errors::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let categories = state
        .recipes
        .list_categories()
        .await
        .map_err(|err| ApiError::from_domain(err, "failed to fetch categories"))?;

    Ok(Json(json!({ "data": categories })))
}

/// GET /api/variants
pub async fn list_variants(
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let variants = state
        .recipes
        .list_variants()
        .await
        .map_err(|err| ApiError::from_domain(err, "failed to fetch variants"))?;

    Ok(Json(json!({ "data": variants })))
}

use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use potluck_core::service::{DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use potluck_core::{RecipeDraft, RecipeFilterParams};

use crate::errors::{ApiError, ApiResult};
use crate::state::AppState;

/// Raw query parameters for GET /api/recipes. Everything arrives as text so
/// parse failures produce this API's error bodies instead of axum's.
#[derive(Debug, Default, Deserialize)]
pub struct ListRecipesQuery {
    pub search: Option<String>,
    pub skill_level: Option<String>,
    pub variant_id: Option<String>,
    pub category_id: Option<String>,
    pub max_cooking_time: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// GET /api/recipes
pub async fn list_recipes(
    State(state): State<AppState>,
    query: Result<Query<ListRecipesQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) =
        query.map_err(|_| ApiError::bad_request("invalid query parameters"))?;

    let params = RecipeFilterParams {
        search: present(query.search),
        skill_level: present(query.skill_level),
        variant_id: parse_id_filter(query.variant_id.as_deref(), "invalid variant_id")?,
        category_id: parse_id_filter(query.category_id.as_deref(), "invalid category_id")?,
        max_cooking_time: parse_id_filter(
            query.max_cooking_time.as_deref(),
            "invalid max_cooking_time",
        )?,
    };
    let page = parse_page(query.page.as_deref())?;
    let per_page = parse_per_page(query.per_page.as_deref())?;

    let listing = state
        .recipes
        .list_recipes(params, page, per_page)
        .await
        .map_err(|err| ApiError::from_domain(err, "failed to fetch recipes"))?;

    Ok(Json(listing))
}

/// GET /api/recipes/{id}
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_recipe_id(&id)?;

    let recipe = state
        .recipes
        .get_recipe(id)
        .await
        .map_err(|err| ApiError::from_domain(err, "failed to fetch recipe"))?;

    Ok(Json(json!({ "data": recipe })))
}

/// POST /api/spin
///
/// The filter body is optional; an empty body spins across the whole catalog.
pub async fn spin(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let params = if body.is_empty() {
        RecipeFilterParams::default()
    } else {
        serde_json::from_slice::<RecipeFilterParams>(&body)
            .map_err(|_| ApiError::bad_request("invalid request body"))?
    };

    let recipe = state
        .recipes
        .random_recipe(params)
        .await
        .map_err(|err| ApiError::from_domain(err, "failed to spin wheel"))?;

    Ok(Json(json!({ "recipe": recipe })))
}

/// POST /api/recipes
pub async fn create_recipe(
    State(state): State<AppState>,
    payload: Result<Json<RecipeDraft>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(draft) =
        payload.map_err(|_| ApiError::bad_request("invalid request body"))?;

    let recipe = state
        .recipes
        .create_recipe(draft)
        .await
        .map_err(|err| ApiError::from_domain(err, "failed to create recipe"))?;

    Ok((StatusCode::CREATED, Json(json!({ "data": recipe }))))
}

/// PUT /api/recipes/{id}
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RecipeDraft>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_recipe_id(&id)?;
    let Json(draft) =
        payload.map_err(|_| ApiError::bad_request("invalid request body"))?;

    let recipe = state
        .recipes
        .update_recipe(id, draft)
        .await
        .map_err(|err| ApiError::from_domain(err, "failed to update recipe"))?;

    Ok(Json(json!({ "data": recipe })))
}

/// DELETE /api/recipes/{id}
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_recipe_id(&id)?;

    state
        .recipes
        .delete_recipe(id)
        .await
        .map_err(|err| ApiError::from_domain(err, "failed to delete recipe"))?;

    Ok(Json(json!({ "message": "recipe deleted successfully" })))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Numeric filters reject only values that fail to parse; range is the
/// store's concern.
fn parse_id_filter(
    raw: Option<&str>,
    message: &'static str,
) -> Result<Option<i32>, ApiError> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| ApiError::bad_request(message))
}

fn parse_page(raw: Option<&str>) -> Result<i64, ApiError> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_PAGE);
    };
    match raw.parse::<i64>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(ApiError::bad_request("invalid page")),
    }
}

fn parse_per_page(raw: Option<&str>) -> Result<i64, ApiError> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_PER_PAGE);
    };
    match raw.parse::<i64>() {
        Ok(per_page) if (1..=MAX_PER_PAGE).contains(&per_page) => Ok(per_page),
        _ => Err(ApiError::bad_request("invalid per_page (must be 1-100)")),
    }
}

fn parse_recipe_id(raw: &str) -> Result<i32, ApiError> {
    match raw.parse::<i32>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ApiError::bad_request("invalid recipe ID")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_blank_paging_falls_back_to_defaults() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some("")).unwrap(), 1);
        assert_eq!(parse_per_page(None).unwrap(), 10);
        assert_eq!(parse_per_page(Some("")).unwrap(), 10);
    }

    #[test]
    fn explicit_bad_page_is_rejected() {
        for raw in ["0", "-1", "abc", "1.5"] {
            let err = parse_page(Some(raw)).unwrap_err();
            assert_eq!(err.message, "invalid page", "input {raw:?}");
        }
    }

    #[test]
    fn per_page_is_bounded_to_one_through_one_hundred() {
        assert_eq!(parse_per_page(Some("1")).unwrap(), 1);
        assert_eq!(parse_per_page(Some("100")).unwrap(), 100);
        for raw in ["0", "101", "abc"] {
            let err = parse_per_page(Some(raw)).unwrap_err();
            assert_eq!(err.message, "invalid per_page (must be 1-100)", "input {raw:?}");
        }
    }

    #[test]
    fn id_filters_pass_numbers_and_reject_garbage() {
        assert_eq!(parse_id_filter(Some("7"), "invalid variant_id").unwrap(), Some(7));
        assert_eq!(parse_id_filter(Some("-3"), "invalid variant_id").unwrap(), Some(-3));
        assert_eq!(parse_id_filter(None, "invalid variant_id").unwrap(), None);
        assert_eq!(parse_id_filter(Some(""), "invalid variant_id").unwrap(), None);

        let err = parse_id_filter(Some("seven"), "invalid variant_id").unwrap_err();
        assert_eq!(err.message, "invalid variant_id");
    }

    #[test]
    fn recipe_ids_must_be_positive_integers() {
        assert_eq!(parse_recipe_id("12").unwrap(), 12);
        for raw in ["0", "-4", "abc", "12abc"] {
            let err = parse_recipe_id(raw).unwrap_err();
            assert_eq!(err.message, "invalid recipe ID", "input {raw:?}");
        }
    }
}

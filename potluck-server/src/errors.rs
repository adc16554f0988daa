use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use potluck_core::RecipeError;

pub type ApiResult<T> = Result<T, ApiError>;

/// An HTTP-shaped error. Serializes as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a domain error onto the wire. Validation and not-found messages
    /// pass through; internal detail is logged and replaced with `failure`
    /// so store errors never leak to clients.
    pub fn from_domain(err: RecipeError, failure: &'static str) -> Self {
        match err {
            RecipeError::NotFound(message) => Self::not_found(message),
            RecipeError::Internal(detail) => {
                error!("{failure}: {detail}");
                Self::internal(failure)
            }
            err @ RecipeError::InvalidParams(_) => Self::bad_request(err.to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

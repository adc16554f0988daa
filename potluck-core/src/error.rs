use thiserror::Error;

/// The three error kinds every layer of the API speaks. Classification
/// happens once, at the layer that observes the failure; layers above may
/// add context but must not change the kind.
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, RecipeError>;

impl RecipeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecipeError::NotFound(_))
    }

    pub fn is_invalid_params(&self) -> bool {
        matches!(self, RecipeError::InvalidParams(_))
    }
}

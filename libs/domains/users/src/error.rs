use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

use crate::validate::FieldError;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("No fields to update")]
    EmptyUpdate,

    #[error("Email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid user id: {0}")]
    InvalidId(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses.
///
/// Client-correctable failures (validation, duplicates, malformed ids,
/// empty updates) map to 400, missing records to 404, everything else
/// to 500.
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(field_errors) => AppError::BadRequestWithDetails {
                message: "Validation failed".to_string(),
                details: serde_json::json!(field_errors),
            },
            UserError::EmptyUpdate => AppError::BadRequest("No fields to update".to_string()),
            UserError::DuplicateEmail(_) => AppError::BadRequest("Email already exists".to_string()),
            UserError::InvalidId(id) => AppError::BadRequest(format!("Invalid user id: {}", id)),
            UserError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            UserError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

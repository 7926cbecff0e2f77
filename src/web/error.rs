use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::db::services::TripLogError;
use crate::report::RenderError;

/// Message shared by every login failure, whether or not the email exists.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "No active account found with the given credentials";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password hashing failed: {0}")]
    PasswordHashingError(String),
    #[error("JWT creation failed: {0}")]
    TokenCreationError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UserAlreadyExists(msg) => (StatusCode::CONFLICT, msg),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                INVALID_CREDENTIALS_MESSAGE.to_string(),
            ),
            AppError::PasswordHashingError(msg) => {
                error!(error = %msg, "Password hashing failed.");
                (StatusCode::INTERNAL_SERVER_ERROR, "Password hashing error".to_string())
            }
            AppError::TokenCreationError(msg) => {
                error!(error = %msg, "Token creation failed.");
                (StatusCode::INTERNAL_SERVER_ERROR, "Token creation error".to_string())
            }
            AppError::DatabaseError(msg) => {
                error!(error = %msg, "Database error while handling request.");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::InternalServerError(msg) => {
                error!(error = %msg, "Internal server error while handling request.");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };
        (status, Json(serde_json::json!({ "error": error_message }))).into_response()
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<TripLogError> for AppError {
    fn from(err: TripLogError) -> Self {
        match err {
            TripLogError::DbErr(e) => AppError::DatabaseError(e.to_string()),
            TripLogError::NotFound(resource) => AppError::NotFound(format!("{resource} not found")),
            TripLogError::Validation(msg) => AppError::InvalidInput(msg),
            TripLogError::DuplicateEmail(email) => {
                AppError::UserAlreadyExists(format!("A user with the email '{email}' already exists."))
            }
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

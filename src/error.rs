use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Request-level failures. Almost everything in this application is
/// recovered at the form boundary; these are the cases that escape to
/// the HTTP layer.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email already registered")]
    DuplicateIdentity,

    #[error("Invalid credentials")]
    Authentication,

    #[error("Internal server error")]
    InternalError,
}

impl From<crate::services::identity::IdentityError> for AppError {
    fn from(err: crate::services::identity::IdentityError) -> Self {
        use crate::services::identity::IdentityError;
        match err {
            IdentityError::EmailTaken => AppError::DuplicateIdentity,
            IdentityError::EmailRequired
            | IdentityError::SuperuserMustBeStaff
            | IdentityError::SuperuserMustBeSuperuser => AppError::Validation(err.to_string()),
            IdentityError::HashingError(_) | IdentityError::Repository(_) => {
                AppError::InternalError
            }
        }
    }
}

impl From<crate::services::auth::AuthError> for AppError {
    fn from(err: crate::services::auth::AuthError) -> Self {
        use crate::services::auth::AuthError;
        match err {
            AuthError::InvalidCredentials | AuthError::UserNotFound => AppError::Authentication,
            AuthError::Repository(_) => AppError::InternalError,
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(_: tower_sessions::session::Error) -> Self {
        AppError::InternalError
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Authentication => (
                StatusCode::UNAUTHORIZED,
                "Authentication failed".to_string(),
            ),
            AppError::DuplicateIdentity => {
                (StatusCode::CONFLICT, "Email already registered".to_string())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(_) | AppError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, error_message).into_response()
    }
}

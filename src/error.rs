//! Error types for Stacks server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable error codes returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchUser = 4,
    NoSuchBook = 5,
    BadValue = 6,
    Duplicate = 7,
    BookUnavailable = 10,
    AlreadyBorrowed = 11,
    AlreadySold = 12,
    NotAvailable = 13,
    AlreadyPurchased = 14,
    AlreadyFavorited = 15,
    AlreadyReviewed = 16,
    NoActiveLoan = 17,
}

/// Business rule that blocked a book transition.
///
/// The message is shown to the caller as-is.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    #[error("This book is not available for borrowing.")]
    BookUnavailable,

    #[error("You have already borrowed this book.")]
    AlreadyBorrowed,

    #[error("This book has already been sold.")]
    AlreadySold,

    #[error("This book is not available for purchase.")]
    NotAvailable,

    #[error("You have already purchased this book.")]
    AlreadyPurchased,

    #[error("You have already favorited this book.")]
    AlreadyFavorited,

    #[error("You have already reviewed this book.")]
    AlreadyReviewed,

    #[error("This book is not currently borrowed by you.")]
    NoActiveLoan,
}

impl Violation {
    pub fn code(&self) -> ErrorCode {
        match self {
            Violation::BookUnavailable => ErrorCode::BookUnavailable,
            Violation::AlreadyBorrowed => ErrorCode::AlreadyBorrowed,
            Violation::AlreadySold => ErrorCode::AlreadySold,
            Violation::NotAvailable => ErrorCode::NotAvailable,
            Violation::AlreadyPurchased => ErrorCode::AlreadyPurchased,
            Violation::AlreadyFavorited => ErrorCode::AlreadyFavorited,
            Violation::AlreadyReviewed => ErrorCode::AlreadyReviewed,
            Violation::NoActiveLoan => ErrorCode::NoActiveLoan,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Unknown book
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unknown user or profile
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Precondition failed: {0}")]
    Precondition(#[from] Violation),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    /// Translate a failed write into the business rule it broke.
    ///
    /// `constraints` maps unique index names to the violation they enforce.
    /// Foreign key failures mean the acting user has no local row. Anything
    /// else stays a database fault.
    pub fn from_constraint(err: sqlx::Error, constraints: &[(&str, Violation)]) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                let hit = db_err.constraint().and_then(|name| {
                    constraints
                        .iter()
                        .find(|(constraint, _)| *constraint == name)
                        .map(|(_, violation)| *violation)
                });
                if let Some(violation) = hit {
                    return AppError::Precondition(violation);
                }
            }
            if db_err.is_foreign_key_violation() {
                return AppError::UserNotFound("User not found".to_string());
            }
        }
        AppError::Database(err)
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook, msg.clone()),
            AppError::UserNotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchUser, msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
            AppError::Precondition(violation) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                violation.code(),
                violation.to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

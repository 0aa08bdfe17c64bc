//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler  Result<Json<T>, ApiError>                                     │
//! │     │                                                                   │
//! │     ├── DbError::Domain(CoreError)  business rule  ──► 400 / 404 / 409  │
//! │     ├── DbError::NotFound                          ──► 404              │
//! │     ├── DbError::UniqueViolation                   ──► 409              │
//! │     ├── JsonRejection (bad body)                   ──► 400              │
//! │     └── anything else         logged, generic text ──► 500              │
//! │                                                                         │
//! │  Body: { "code": "STOCK_CONFLICT", "message": "Stock update conflict…" }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The web client switches on `code` and shows `message` as is.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inkline_core::{CoreError, ValidationError};
use inkline_db::DbError;
use serde::Serialize;

/// API error returned from handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Pre-check found too little stock (400)
    InsufficientStock,

    /// Payment would exceed the purchased total (400)
    PaymentExceedsPurchased,

    /// Lost a race for stock; resubmit (409)
    StockConflict,

    /// Unique value already taken (409)
    Duplicate,

    /// Still referenced by other records (409)
    InUse,

    /// Resource not found (404)
    NotFound,

    /// Missing or invalid bearer token (401)
    Unauthorized,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: ErrorCode,
    message: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            format!("{resource} not found: {id}"),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, message)
    }

    pub fn unauthorized() -> Self {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Missing or invalid token",
        )
    }

    /// Logs `detail` and hides it from the client.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", detail);
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal,
            "Something went wrong",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Duplicate { .. } => {
                ApiError::new(StatusCode::CONFLICT, ErrorCode::Duplicate, err.to_string())
            }
            _ => ApiError::validation(err.to_string()),
        }
    }
}

/// Malformed or mistyped JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Converts business rule errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::Validation(e) => e.into(),
            CoreError::EmptyCart
            | CoreError::InvalidQuantity { .. }
            | CoreError::NegativeStock { .. } => ApiError::validation(message),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::InsufficientStock, message)
            }
            CoreError::PaymentExceedsPurchased { .. } => ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::PaymentExceedsPurchased,
                message,
            ),
            CoreError::ProductNotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message)
            }
            CoreError::StockConflict { .. } => {
                ApiError::new(StatusCode::CONFLICT, ErrorCode::StockConflict, message)
            }
            CoreError::InUse { .. } => ApiError::new(StatusCode::CONFLICT, ErrorCode::InUse, message),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(e) => e.into(),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                StatusCode::CONFLICT,
                ErrorCode::Duplicate,
                format!("{field} '{value}' already exists"),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!("Database operation failed: {}", other);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseError,
                    "Database operation failed",
                )
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

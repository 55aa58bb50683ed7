use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use spinvault_core::error::{CoreError, ErrorClass};
use spinvault_core::rate_limit::RateLimited;
use spinvault_engine::EngineError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`EngineError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// `{ "error", "code", "class" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A generic domain error from `spinvault_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A spin, ledger, payment or odds failure from `spinvault_engine`.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Too many requests from one user in the trailing window.
    #[error("Rate limit exceeded")]
    RateLimited { retry_after: Duration },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<RateLimited> for AppError {
    fn from(limited: RateLimited) -> Self {
        AppError::RateLimited {
            retry_after: limited.retry_after,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    class: ErrorClass,
    message: String,
    retry_after: Option<u64>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, class: ErrorClass, message: String) -> Self {
        Self {
            status,
            code,
            class,
            message,
            retry_after: None,
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            ErrorClass::Internal,
            "An internal error occurred".to_string(),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => ErrorParts::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    core.class(),
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => ErrorParts::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    core.class(),
                    msg.clone(),
                ),
                CoreError::Conflict(msg) => {
                    ErrorParts::new(StatusCode::CONFLICT, "CONFLICT", core.class(), msg.clone())
                }
                CoreError::Unauthorized(msg) => ErrorParts::new(
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    core.class(),
                    msg.clone(),
                ),
                CoreError::Forbidden(msg) => {
                    ErrorParts::new(StatusCode::FORBIDDEN, "FORBIDDEN", core.class(), msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    ErrorParts::internal()
                }
            },

            // --- Engine errors ---
            AppError::Engine(err) => classify_engine_error(err),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => ErrorParts::new(
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                ErrorClass::Validation,
                msg.clone(),
            ),
            AppError::RateLimited { retry_after } => ErrorParts {
                retry_after: Some(retry_after.as_secs().max(1)),
                ..ErrorParts::new(
                    StatusCode::TOO_MANY_REQUESTS,
                    "RATE_LIMITED",
                    ErrorClass::Transient,
                    "Too many requests, slow down".to_string(),
                )
            },
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorParts::internal()
            }
        };

        let body = json!({
            "error": parts.message,
            "code": parts.code,
            "class": parts.class.as_str(),
        });

        let mut response = (parts.status, axum::Json(body)).into_response();
        if let Some(secs) = parts.retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

/// Map an engine failure onto a status by its [`ErrorClass`].
///
/// Integrity failures keep their message: they point at broken odds or
/// catalog data an operator has to fix.
fn classify_engine_error(err: &EngineError) -> ErrorParts {
    let class = err.class();
    let status = match class {
        ErrorClass::Validation => StatusCode::BAD_REQUEST,
        ErrorClass::Eligibility => StatusCode::FORBIDDEN,
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::Conflict => StatusCode::CONFLICT,
        ErrorClass::Integrity => {
            tracing::error!(error = %err, code = err.code(), "Data integrity failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ErrorClass::Transient => StatusCode::SERVICE_UNAVAILABLE,
        ErrorClass::Internal => {
            tracing::error!(error = %err, "Engine error");
            return ErrorParts::internal();
        }
    };

    let mut parts = ErrorParts::new(status, err.code(), class, err.to_string());
    if class.is_retryable() {
        parts.retry_after = Some(1);
    }
    parts
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => ErrorParts::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            ErrorClass::NotFound,
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return ErrorParts::new(
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        ErrorClass::Conflict,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            ErrorParts::internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorParts::internal()
        }
    }
}

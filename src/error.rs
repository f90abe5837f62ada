use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failure taxonomy of the reservation API. Every handler error maps onto one
/// of these variants, and every response body is `{"error": "..."}`.
#[derive(Debug)]
pub enum AppError {
    /// Unknown lab, user, reservation or association id.
    NotFound(String),
    /// Missing, invalid or expired credentials/token.
    Unauthorized(String),
    /// Authenticated, but the caller's role or lab scope does not cover the
    /// action.
    Forbidden(String),
    /// Malformed or semantically invalid input: inverted interval, past start
    /// time, short password, role/moderator_type mismatch, consumed token.
    Validation(String),
    /// The request lost against existing state: overlapping reservation,
    /// duplicate email or lab link, or a reservation that is already
    /// resolved.
    Conflict(String),
    /// The login gate blocked this email after repeated failed attempts.
    TooManyAttempts(String),
    Internal(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "not found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            AppError::Forbidden(msg) => write!(f, "forbidden: {msg}"),
            AppError::Validation(msg) => write!(f, "invalid input: {msg}"),
            AppError::Conflict(msg) => write!(f, "conflict: {msg}"),
            AppError::TooManyAttempts(msg) => write!(f, "login blocked: {msg}"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
            AppError::Database(err) => write!(f, "database error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::TooManyAttempts(msg) => (StatusCode::TOO_MANY_REQUESTS, msg.clone()),
            // Internal details stay out of the response body.
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

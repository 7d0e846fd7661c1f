//! Error types for web handlers.
//!
//! Bridges the engine's error taxonomy to HTTP responses via Axum's
//! `IntoResponse`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use flashdrop_core::{ErrorKind, IssueError};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Wraps engine errors (and anything else the handlers hit) with an HTTP
/// status, a stable machine-readable code and a user-facing message.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: &'static str,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: &'static str) -> Self {
        Self { status, message, code, source: None }
    }

    /// Attach the underlying error for server-side logging.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message.into(), "INTERNAL")
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<IssueError> for AppError {
    fn from(err: IssueError) -> Self {
        let (status, code) = match err.kind() {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            ErrorKind::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
            ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };
        Self::new(status, err.to_string(), code).with_source(err.into())
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Error code (for client error handling).
    code: &'static str,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = self.code,
                message = %self.message,
                source = ?self.source,
                "Request failed"
            );
        }

        let body = ErrorBody { code: self.code, message: self.message };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashdrop_core::{ClaimantId, ItemId};

    #[test]
    fn issue_errors_map_to_expected_statuses() {
        let cases: Vec<(IssueError, StatusCode, &str)> = vec![
            (IssueError::ItemNotFound(ItemId(1)), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                IssueError::AlreadyClaimed { claimant_id: ClaimantId(1), item_id: ItemId(1) },
                StatusCode::CONFLICT,
                "CONFLICT",
            ),
            (
                IssueError::Exhausted { item_id: ItemId(1) },
                StatusCode::CONFLICT,
                "CONFLICT",
            ),
            (IssueError::RateLimited, StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            (
                IssueError::StoreUnavailable("down".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
            ),
            (
                IssueError::RollbackFailed {
                    claimant_id: ClaimantId(1),
                    item_id: ItemId(1),
                    reason: "down".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
            ),
        ];

        for (err, status, code) in cases {
            let app_err = AppError::from(err);
            assert_eq!(app_err.status(), status);
            assert_eq!(app_err.code(), code);
        }
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = AppError::from(IssueError::RateLimited);
        assert_eq!(err.to_string(), "[RATE_LIMITED] Too many claim attempts");
    }
}

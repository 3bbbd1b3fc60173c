//! Error types for Tweeter
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` and acts as the terminal error
//! handler for every route.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

const SERVER_ERROR_TITLE: &str = "Server Error";
const SERVER_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Application-wide error type
///
/// Handlers return `Result<_>` (the alias below) and forward failures with `?`,
/// so every rejected store call ends up here instead of in a panic.
#[derive(Debug, Error)]
pub enum AppError {
    /// No tweet with the requested id (404)
    #[error("The tweet with id of {id} could not be found")]
    TweetNotFound { id: String },

    /// Request body failed the validation gate (400)
    ///
    /// Carries one message per failed rule, in rule order.
    #[error("Bad request.")]
    BadRequest { errors: Vec<String> },

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    pub fn tweet_not_found(id: impl ToString) -> Self {
        AppError::TweetNotFound { id: id.to_string() }
    }

    pub fn bad_request(errors: Vec<String>) -> Self {
        AppError::BadRequest { errors }
    }

    /// Short machine-readable name, used as the metric label
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::TweetNotFound { .. } => "not_found",
            AppError::BadRequest { .. } => "bad_request",
            AppError::Database(_) => "database",
            AppError::Config(_) => "config",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::TweetNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppError::TweetNotFound { .. } => "Tweet Not found",
            AppError::BadRequest { .. } => "Bad request.",
            _ => SERVER_ERROR_TITLE,
        }
    }

    /// Individual validation messages; empty for every other kind
    pub fn messages(&self) -> &[String] {
        match self {
            AppError::BadRequest { errors } => errors,
            _ => &[],
        }
    }
}

/// JSON body written for every error response
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    title: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        use axum::Json;

        let status = self.status();

        // Server-side failures keep their detail in the logs only.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Request failed");
            SERVER_ERROR_MESSAGE.to_string()
        } else {
            tracing::debug!(error = %self, kind = self.kind(), "Request rejected");
            self.to_string()
        };

        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[self.kind()]).inc();

        let body = ErrorBody {
            title: self.title(),
            message,
            errors: self.messages().to_vec(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

//! HTTP error mapping

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use gameshelf_library::LibraryError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors returned by the game API handlers
///
/// Internal failures carry only a fixed user-facing message; the cause is
/// logged where the error is created.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Search term is required")]
    MissingSearchTerm,

    #[error("User ID required")]
    MissingUser,

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Game not found")]
    GameNotFound,

    #[error("{0}")]
    Internal(&'static str),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Log a library failure and replace it with a generic message
    pub fn internal(context: &str, message: &'static str, cause: &LibraryError) -> Self {
        error!("{} error: {}", context, cause);
        ApiError::Internal(message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingSearchTerm | ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::MissingUser => StatusCode::UNAUTHORIZED,
            ApiError::GameNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

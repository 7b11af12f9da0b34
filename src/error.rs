//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::info;

use crate::storage::ResolveError;

/// Errors that end a request.
#[derive(Debug)]
pub enum RelayError {
    /// The prompt was rejected before any upstream call
    InvalidPrompt(String),
    /// The image identifier failed validation
    InvalidImageId,
    /// A validated identifier still resolved outside the storage root
    Forbidden,
    /// When a requested resource is not found
    NotFound(String),
    /// The generation API or the image download failed
    Upstream(String),
    /// The font or the generated image couldn't be used
    Render(String),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPrompt(message) => write!(f, "invalid prompt: {message}"),
            Self::InvalidImageId => write!(f, "invalid image ID"),
            Self::Forbidden => write!(f, "access forbidden"),
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::Upstream(message) => write!(f, "upstream failure: {message}"),
            Self::Render(message) => write!(f, "render failure: {message}"),
            Self::InternalServerError(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl std::error::Error for RelayError {}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::InternalServerError(err.to_string())
    }
}

impl From<axum::http::Error> for RelayError {
    fn from(err: axum::http::Error) -> Self {
        RelayError::InternalServerError(err.to_string())
    }
}

impl From<ResolveError> for RelayError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Malformed => RelayError::InvalidImageId,
            ResolveError::OutsideRoot => RelayError::Forbidden,
        }
    }
}

fn json_error(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::InvalidPrompt(message) => {
                info!("Rejected prompt: {}", message);
                json_error(StatusCode::BAD_REQUEST, message)
            }
            RelayError::InvalidImageId => {
                info!("Bad image ID received");
                (StatusCode::BAD_REQUEST, "Invalid image ID").into_response()
            }
            RelayError::Forbidden => {
                tracing::warn!("Resolved image path escaped the storage root");
                (StatusCode::FORBIDDEN, "Access forbidden").into_response()
            }
            RelayError::NotFound(what) => {
                info!("404 {what}");
                (StatusCode::NOT_FOUND, "Not Found").into_response()
            }
            RelayError::Upstream(message) => {
                tracing::error!("Upstream error: {}", message);
                json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            RelayError::Render(message) => {
                tracing::error!("Render error: {}", message);
                json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            RelayError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

//! Error types for the catalog client and gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Api Error Enum ==
/// Unified error type for upstream calls and gateway handlers.
///
/// Cache lookups never produce errors; a miss simply falls through to the
/// network.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout)
    #[error("Failed to fetch {resource}: {message}")]
    Fetch { resource: String, message: String },

    /// The upstream answered with a non-success status
    #[error("Failed to fetch {resource}: upstream returned {status}")]
    Upstream { resource: String, status: u16 },

    /// The upstream reported the resource as missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// The upstream body was not the expected JSON
    #[error("Invalid response for {resource}: {message}")]
    Decode { resource: String, message: String },

    /// Admin operation attempted without a bearer token, or rejected by upstream
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Classifies a transport error from reqwest.
    pub fn fetch(resource: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::Decode {
                resource: resource.to_string(),
                message: err.to_string(),
            };
        }
        ApiError::Fetch {
            resource: resource.to_string(),
            message: err.to_string(),
        }
    }

    /// Classifies a non-success upstream status.
    pub fn from_status(resource: &str, status: reqwest::StatusCode) -> Self {
        match status {
            reqwest::StatusCode::NOT_FOUND => ApiError::NotFound(resource.to_string()),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                ApiError::Unauthorized(format!("upstream rejected access to {}", resource))
            }
            _ => ApiError::Upstream {
                resource: resource.to_string(),
                status: status.as_u16(),
            },
        }
    }

    /// HTTP status the gateway answers with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Fetch { .. } | ApiError::Decode { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

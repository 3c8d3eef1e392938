///! Standardized error handling for API responses
///!
///! Provides consistent JSON error responses across all API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use selfservice_common::{messages, Error, ErrorKind};
use serde::{Deserialize, Serialize};

/// Error response body. `message` is localized and meant for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,

    /// Error code for programmatic handling
    pub error: ErrorKind,

    /// Human-readable error message
    pub message: String,

    /// Timestamp when error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(status: u16, error: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Wrapper that turns portal errors into HTTP responses
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// Request body could not be bound to the expected command
    pub fn wrong_usage() -> Self {
        ApiError(Error::Validation(messages::WRONG_API_USAGE.to_string()))
    }

    pub fn status_code(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::RemoteApi => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.status_code().as_u16(), self.0.kind(), self.0.message())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_error_response())).into_response()
    }
}

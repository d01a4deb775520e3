//! JSON error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ozone_core::error::OzoneError;
use ozone_seasonal::SeasonalError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable code such as "bad_request" or "not_found".
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<OzoneError> for ApiError {
    fn from(err: OzoneError) -> Self {
        match err {
            OzoneError::InvalidInput(msg) => ApiError::BadRequest(msg),
            OzoneError::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<SeasonalError> for ApiError {
    fn from(err: SeasonalError) -> Self {
        OzoneError::from(err).into()
    }
}

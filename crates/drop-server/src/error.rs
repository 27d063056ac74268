//! Mapping of core errors onto HTTP responses.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub code: &'static str,
    pub message: String,
}

/// Error returned by JSON handlers.
#[derive(Debug)]
pub enum ApiError {
    Core(drop_core::Error),
    /// Body that could not be extracted: wrong content type, malformed or
    /// oversized form or multipart data.
    Request { status: StatusCode, detail: String },
}

impl From<drop_core::Error> for ApiError {
    fn from(e: drop_core::Error) -> Self {
        ApiError::Core(e)
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::Request {
            status: e.status(),
            detail: e.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        ApiError::Request {
            status: e.status(),
            detail: e.body_text(),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(e: FormRejection) -> Self {
        ApiError::Request {
            status: e.status(),
            detail: e.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => status_for(e),
            ApiError::Request { status, .. } => *status,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Core(e) => e.code(),
            ApiError::Request { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                "too_large"
            }
            ApiError::Request { .. } => "invalid_request",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Core(drop_core::Error::Storage { .. }) => {
                "Storage failure, please try again later".to_string()
            }
            ApiError::Core(drop_core::Error::Auth) => "Please log in first".to_string(),
            ApiError::Core(e) => e.to_string(),
            ApiError::Request { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                "Upload exceeds the size limit".to_string()
            }
            ApiError::Request { detail, .. } => detail.clone(),
        }
    }
}

pub fn status_for(error: &drop_core::Error) -> StatusCode {
    use drop_core::Error;
    match error {
        Error::Auth => StatusCode::UNAUTHORIZED,
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::SizeLimit { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        Error::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Core(e @ drop_core::Error::Storage { .. }) => {
                tracing::error!("Request failed: {}", e);
            }
            ApiError::Core(drop_core::Error::Auth) => {
                tracing::warn!("Rejected unauthenticated request");
            }
            _ => tracing::debug!("Request rejected ({}): {}", status, self.message()),
        }

        let body = ErrorBody {
            success: false,
            code: self.code(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

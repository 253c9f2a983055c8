//! API error handling for the sync API.
//!
//! Every failure renders as `{"error": true, "code": ..., "message": ...}`.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::SyncError;

/// Machine-readable error code carried in the `code` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    /// A caller-supplied path or folder name failed the path guard.
    InvalidPath,
    Unauthorized,
    Forbidden,
    NotFound,
    /// Field rules failed; `details` lists the fields.
    ValidationError,
    /// Request body over the upload limit.
    PayloadTooLarge,
    /// Token endpoint limit hit.
    RateLimited,
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status_code(&self) -> StatusCode {
        use ErrorCode::*;
        match self {
            BadRequest | InvalidPath => StatusCode::BAD_REQUEST,
            Unauthorized => StatusCode::UNAUTHORIZED,
            Forbidden => StatusCode::FORBIDDEN,
            NotFound => StatusCode::NOT_FOUND,
            ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RateLimited => StatusCode::TOO_MANY_REQUESTS,
            InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Field name to the messages of every rule it failed.
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Wire form of an error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Map a multipart read failure. A body over the size limit keeps its
    /// 413; anything else becomes a 400 with `message`.
    pub fn from_multipart(err: MultipartError, message: &str) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::warn!("Upload rejected: {}", err);
            return Self::new(ErrorCode::PayloadTooLarge, "Upload exceeds the size limit.");
        }
        tracing::error!("{}: {}", message, err);
        Self::bad_request(message)
    }

    /// 422 listing each failed field. Rules without a message fall back to
    /// the rule code.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let details: FieldErrors = errors
            .field_errors()
            .into_iter()
            .map(|(field, failures)| {
                let messages = failures
                    .iter()
                    .map(|f| match &f.message {
                        Some(m) => m.to_string(),
                        None => format!("{field}: {}", f.code),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Self {
            code: ErrorCode::ValidationError,
            message: "Validation failed".to_string(),
            details: Some(details),
        }
    }

    fn into_body(self) -> ErrorBody {
        ErrorBody {
            error: true,
            code: self.code,
            message: self.message,
            details: self.details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status_code(), Json(self.into_body())).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Auth(msg) => ApiError::unauthorized(msg),
            SyncError::Permission(msg) => ApiError::forbidden(msg),
            SyncError::PathRejected(msg) => ApiError::new(ErrorCode::InvalidPath, msg),
            SyncError::Validation(msg) => ApiError::bad_request(msg),
            SyncError::NotFound(what) => ApiError::not_found(format!("{what} not found.")),
            other => {
                tracing::error!("Internal error: {}", other);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

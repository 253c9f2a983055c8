//! JSON body validation for sync API requests.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::web::error::ApiError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON is a 400 `BAD_REQUEST`; rule failures are a 422 with the
/// failing fields listed under `details`.
pub struct ValidatedJson<T>(pub T);

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected a JSON body (Content-Type: application/json)".to_string()
        }
        other => format!("Invalid JSON: {}", other.body_text()),
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection, "Rejected request body");
            ApiError::bad_request(rejection_message(&rejection))
        })?;

        body.validate().map_err(ApiError::from_validation_errors)?;
        Ok(ValidatedJson(body))
    }
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Rejects values that are empty or only whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("not_blank", "Must not be empty"));
    }
    Ok(())
}

/// Rejects any control character, newlines included.
///
/// Subject ids and paths are single-line values that end up in log lines.
pub fn single_line(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_control) {
        return Err(rule("single_line", "Must not contain control characters"));
    }
    Ok(())
}

/// [`not_blank`] and [`single_line`] together, for ids and paths.
pub fn required_single_line(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    single_line(value)
}

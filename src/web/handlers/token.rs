//! Token handler.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::{Envelope, TokenRequest, TokenResponse, ValidatedJson};
use crate::web::error::ApiError;

/// POST /api/v1/token - Authenticate and obtain a bearer token.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<TokenRequest>,
) -> Result<Json<Envelope<TokenResponse>>, ApiError> {
    let reply = state
        .gateway
        .issue_token(&req.user, &req.password, req.folder.as_deref())?;

    Ok(Json(Envelope::from_reply(reply, |issued| TokenResponse {
        token: issued.token,
        user_folder: issued.folder,
        expires_in: issued.expires_in,
    })))
}

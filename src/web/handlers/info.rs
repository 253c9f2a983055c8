//! Unauthenticated information handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::gateway::{FolderOverview, ServiceStatus};
use crate::web::dto::Envelope;
use crate::web::error::ApiError;

/// GET /api/v1/folders - Existing folders and configured logins.
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<FolderOverview>>, ApiError> {
    let reply = state.gateway.list_folders()?;
    Ok(Json(Envelope::from_reply(reply, |overview| overview)))
}

/// GET /api/v1/status - API status check.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Envelope<ServiceStatus>> {
    Json(Envelope::from_reply(state.gateway.status(), |status| status))
}

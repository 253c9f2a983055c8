//! Management handlers used by the sync client.

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::{
    CreateFolderRequest, CreateFolderResponse, Empty, Envelope, MetadataResponse,
    SyncDeleteRequest, SyncUploadResponse, UploadsResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::ManagementToken;

/// GET /api/v1/uploads - List every non-empty upload folder.
pub async fn list_uploads(
    State(state): State<Arc<AppState>>,
    token: ManagementToken,
) -> Result<Json<Envelope<UploadsResponse>>, ApiError> {
    let reply = state.gateway.list_uploads(token.as_str())?;
    Ok(Json(Envelope::from_reply(reply, |uploads| {
        UploadsResponse { uploads }
    })))
}

/// POST /api/v1/sync_upload - Place a file at `target_path`.
///
/// Multipart fields: `target_path` (text) and `file`. The caller must hold a
/// management token before any field is read.
pub async fn sync_upload(
    State(state): State<Arc<AppState>>,
    token: ManagementToken,
    mut multipart: Multipart,
) -> Result<Json<Envelope<SyncUploadResponse>>, ApiError> {
    let mut target_path: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, "Invalid multipart data"))?
    {
        match field.name().unwrap_or("") {
            "target_path" => {
                target_path = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::from_multipart(e, "Invalid target_path"))?,
                );
            }
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::from_multipart(e, "Failed to read file"))?;
                file = Some((filename, content.to_vec()));
            }
            _ => {}
        }
    }

    let target_path =
        target_path.ok_or_else(|| ApiError::bad_request("Missing parameter: target_path"))?;
    let (filename, content) = file.ok_or_else(|| ApiError::bad_request("No file provided."))?;
    if filename.is_empty() {
        return Err(ApiError::bad_request("Empty file."));
    }

    let reply = state
        .gateway
        .sync_place(token.as_str(), &target_path, &content)?;
    Ok(Json(Envelope::from_reply(reply, |path| {
        SyncUploadResponse { path }
    })))
}

/// POST /api/v1/sync_delete - Delete a file from `uploads/` or `logs/`.
pub async fn sync_delete(
    State(state): State<Arc<AppState>>,
    token: ManagementToken,
    ValidatedJson(req): ValidatedJson<SyncDeleteRequest>,
) -> Result<Json<Envelope<Empty>>, ApiError> {
    let reply = state.gateway.sync_remove(token.as_str(), &req.file)?;
    Ok(Json(Envelope::from_reply(reply, |()| Empty {})))
}

/// GET /api/v1/file_metadata - Size, mtime and hash of every download file.
pub async fn file_metadata(
    State(state): State<Arc<AppState>>,
    token: ManagementToken,
) -> Result<Json<Envelope<MetadataResponse>>, ApiError> {
    let reply = state.gateway.metadata(token.as_str()).await?;
    Ok(Json(Envelope::from_reply(reply, |change_set| {
        MetadataResponse {
            metadata: change_set.files,
            skipped: change_set.skipped,
        }
    })))
}

/// POST /api/v1/create_folder - Create a folder's download and upload trees.
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    token: ManagementToken,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<Json<Envelope<CreateFolderResponse>>, ApiError> {
    let reply = state.gateway.create_folder(token.as_str(), &req.folder)?;
    Ok(Json(Envelope::from_reply(reply, |folder| {
        CreateFolderResponse { folder }
    })))
}

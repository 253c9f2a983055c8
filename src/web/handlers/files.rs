//! Terminal-facing file handlers: listing, downloads and uploads.

use axum::{
    body::Body,
    extract::{Multipart, Query, State},
    http::header,
    response::Response,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::file::{Download, UploadBlob};
use crate::gateway::UploadReceipt;
use crate::web::dto::{Envelope, FileListResponse, FileQuery};
use crate::web::error::ApiError;
use crate::web::middleware::{BearerToken, VerifiedToken};

/// Content-Disposition value for a download.
///
/// Control characters are dropped and quotes or backslashes replaced in the plain
/// `filename` parameter. Names that needed that, or are not ASCII, also get
/// an RFC 5987 `filename*` parameter carrying the exact name.
fn content_disposition_header(filename: &str) -> String {
    let needs_encoding = !filename.is_ascii()
        || filename
            .chars()
            .any(|c| c.is_control() || c == '"' || c == '\\');

    if !needs_encoding {
        return format!("attachment; filename=\"{filename}\"");
    }

    let fallback: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect();

    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}

/// Build a raw file response for a download.
fn file_response(download: Download) -> Result<Response<Body>, ApiError> {
    let filename = download
        .path
        .rsplit('/')
        .next()
        .unwrap_or(download.path.as_str())
        .to_string();

    let content_type = mime_guess::from_path(&filename)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&filename),
        )
        .header(header::CONTENT_LENGTH, download.content.len())
        .body(Body::from(download.content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

fn required_file(query: FileQuery) -> Result<String, ApiError> {
    query
        .file
        .ok_or_else(|| ApiError::bad_request("Missing parameter: file"))
}

/// GET /api/v1/downloads - List global files and the token folder's files.
pub async fn list_downloads(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
) -> Result<Json<Envelope<FileListResponse>>, ApiError> {
    let reply = state.gateway.list_downloads(token.as_str())?;
    Ok(Json(Envelope::from_reply(reply, |files| FileListResponse {
        files,
    })))
}

/// GET /api/v1/download_auto?file= - Download by filename, folder copy first.
pub async fn download_auto(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
    Query(query): Query<FileQuery>,
) -> Result<Response<Body>, ApiError> {
    let filename = required_file(query)?;
    let reply = state.gateway.download_fallback(token.as_str(), &filename)?;
    file_response(reply.payload)
}

/// GET /api/v1/download?file= - Download by path under `downloads/`.
pub async fn download(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
    Query(query): Query<FileQuery>,
) -> Result<Response<Body>, ApiError> {
    let path = required_file(query)?;
    let reply = state.gateway.download_exact(token.as_str(), &path)?;
    file_response(reply.payload)
}

/// POST /api/v1/upload - Upload files into the token's upload folder.
///
/// Every multipart field that carries a filename is stored, whatever its
/// field name. Plain form fields are ignored. The token is checked before
/// the body is read.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    token: VerifiedToken,
    mut multipart: Multipart,
) -> Result<Json<Envelope<UploadReceipt>>, ApiError> {
    let mut blobs = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, "Invalid multipart data"))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::from_multipart(e, "Failed to read file"))?;
        blobs.push(UploadBlob::new(filename, content.to_vec()));
    }

    let reply = state.gateway.upload(token.as_str(), blobs)?;
    Ok(Json(Envelope::from_reply(reply, |receipt| receipt)))
}

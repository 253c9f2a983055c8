//! Response DTOs for the sync API.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::file::{FileRecord, SkippedEntry};
use crate::gateway::Reply;

// ============================================================================
// Envelope
// ============================================================================

/// Success envelope: `{"error": false, "message": ..., ...payload}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    /// Always `false`.
    pub error: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Operation payload, flattened into the envelope.
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Envelope<T> {
    /// Create a success envelope.
    pub fn new(message: impl Into<String>, payload: T) -> Self {
        Self {
            error: false,
            message: message.into(),
            payload,
        }
    }

    /// Wrap a gateway reply, mapping its payload to a wire DTO.
    pub fn from_reply<P>(reply: Reply<P>, map: impl FnOnce(P) -> T) -> Self {
        Self::new(reply.message, map(reply.payload))
    }
}

/// Payload for operations that return nothing besides the message.
#[derive(Debug, Serialize)]
pub struct Empty {}

// ============================================================================
// Payloads
// ============================================================================

/// Token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub token: String,
    /// Folder assigned to the token.
    pub user_folder: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

/// Download listing.
#[derive(Debug, Serialize)]
pub struct FileListResponse {
    /// Relative paths.
    pub files: Vec<String>,
}

/// Upload listing keyed by folder.
#[derive(Debug, Serialize)]
pub struct UploadsResponse {
    /// Folder to filenames.
    pub uploads: BTreeMap<String, Vec<String>>,
}

/// Path written by a sync upload.
#[derive(Debug, Serialize)]
pub struct SyncUploadResponse {
    /// Relative path.
    pub path: String,
}

/// Change detection metadata.
#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    /// Records keyed by relative path.
    pub metadata: BTreeMap<String, FileRecord>,
    /// Files that could not be read.
    pub skipped: Vec<SkippedEntry>,
}

/// Created folder.
#[derive(Debug, Serialize)]
pub struct CreateFolderResponse {
    /// Folder name.
    pub folder: String,
}

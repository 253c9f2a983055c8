//! Request DTOs for the sync API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{not_blank, required_single_line};

/// Token request.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    /// Subject id.
    #[validate(custom(function = "required_single_line"))]
    pub user: String,
    /// Secret.
    #[validate(custom(function = "not_blank"))]
    pub password: String,
    /// Requested folder (optional).
    #[serde(default)]
    pub folder: Option<String>,
}

/// Query parameters naming a file.
#[derive(Debug, Deserialize)]
pub struct FileQuery {
    /// Filename or relative path, depending on the endpoint.
    #[serde(default)]
    pub file: Option<String>,
}

/// Sync delete request.
#[derive(Debug, Deserialize, Validate)]
pub struct SyncDeleteRequest {
    /// Relative path of the file to delete.
    #[validate(custom(function = "required_single_line"))]
    pub file: String,
}

/// Folder creation request.
///
/// The name itself is checked by the file store so that the rejection is
/// audited like every other path.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub folder: String,
}

//! Scoped file operations over the data root.
//!
//! Every caller-supplied path or filename is checked by
//! [`super::path_guard`] before any [`Storage`] call is made.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::audit::LOGS_DIR;
use super::path_guard::{
    validate_filename, validate_folder_name, validate_scoped, validate_unreserved, PathViolation,
    RESERVED_PREFIXES,
};
use super::storage::Storage;
use crate::{Result, SyncError};

/// Global download subtree.
pub const DOWNLOADS: &str = "downloads";
/// Parent of the per-folder download subtrees.
pub const USER_DOWNLOADS: &str = "downloads/users";
/// Parent of the per-folder upload subtrees.
pub const UPLOADS: &str = "uploads";

pub const INVALID_FILENAME: &str = "Invalid filename. Use filename only, no paths.";
pub const INVALID_FILE_PATH: &str = "Invalid file path.";
pub const INVALID_TARGET_PATH: &str = "Invalid target path.";
pub const INVALID_FOLDER_NAME: &str = "Invalid folder name. Use only letters, numbers, _ and -";
pub const FILE_ACCESS_DENIED: &str = "Access denied to requested file.";
pub const NO_FILES_PROVIDED: &str = "No files provided.";
pub const SYNC_TARGET_RESERVED: &str = "Cannot sync to uploads or logs directories.";
pub const DELETE_OUTSIDE_RESERVED: &str = "Can only delete from uploads or logs directories.";
pub const NOT_A_FILE: &str = "Path is not a file.";
pub const TARGET_IS_DIRECTORY: &str = "Target path is a directory.";

/// A file read back for a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Relative path the content was read from.
    pub path: String,
    /// File content.
    pub content: Vec<u8>,
}

/// One named file in an upload.
#[derive(Debug, Clone)]
pub struct UploadBlob {
    /// Client-supplied filename, stored verbatim.
    pub filename: String,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadBlob {
    /// Create a new blob.
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Log a guard rejection and turn it into a [`SyncError::PathRejected`].
fn rejected(path: &str, violation: PathViolation, message: &str) -> SyncError {
    tracing::warn!(path = %path, reason = %violation, "Rejected caller-supplied path");
    SyncError::PathRejected(message.to_string())
}

fn checked_folder(folder: &str) -> Result<&str> {
    validate_folder_name(folder)
        .map(|_| folder)
        .map_err(|v| rejected(folder, v, INVALID_FOLDER_NAME))
}

/// File operations scoped to the downloads, uploads and logs subtrees.
#[derive(Clone)]
pub struct FileStore {
    storage: Arc<dyn Storage>,
}

impl FileStore {
    /// Create a store over `storage`.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The underlying storage.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Create the fixed layout plus the folder trees of `subjects`.
    pub fn prepare_layout<'a>(&self, subjects: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for dir in [DOWNLOADS, USER_DOWNLOADS, UPLOADS, LOGS_DIR] {
            self.storage.create_dir_all(dir)?;
        }
        for subject in subjects {
            self.ensure_folder(subject)?;
        }
        Ok(())
    }

    /// Create `downloads/users/{folder}/` and `uploads/{folder}/`. Idempotent.
    pub fn ensure_folder(&self, folder: &str) -> Result<()> {
        let folder = checked_folder(folder)?;
        self.storage.create_dir_all(&format!("{USER_DOWNLOADS}/{folder}"))?;
        self.storage.create_dir_all(&format!("{UPLOADS}/{folder}"))?;
        Ok(())
    }

    /// Create a folder on behalf of a management request.
    pub fn create_folder(&self, name: &str) -> Result<()> {
        self.ensure_folder(name)?;
        tracing::info!(folder = %name, "Folder created");
        Ok(())
    }

    /// Sorted union of folder names under `downloads/users/` and `uploads/`.
    pub fn existing_folders(&self) -> Result<Vec<String>> {
        let mut folders = self.storage.list_dirs(USER_DOWNLOADS)?;
        folders.extend(self.storage.list_dirs(UPLOADS)?);
        folders.sort();
        folders.dedup();
        Ok(folders)
    }

    /// Global downloads followed by the files of `folder`'s own download tree.
    pub fn list(&self, folder: Option<&str>) -> Result<Vec<String>> {
        let folder = folder.filter(|f| !f.is_empty()).map(checked_folder).transpose()?;

        let mut files: Vec<String> = self
            .storage
            .list_files(DOWNLOADS)?
            .into_iter()
            .map(|name| format!("{DOWNLOADS}/{name}"))
            .collect();

        if let Some(folder) = folder {
            let dir = format!("{USER_DOWNLOADS}/{folder}");
            files.extend(
                self.storage
                    .list_files(&dir)?
                    .into_iter()
                    .map(|name| format!("{dir}/{name}")),
            );
        }

        Ok(files)
    }

    /// Fetch `filename` from `folder`'s download tree, falling back to the
    /// global downloads.
    pub fn download_with_fallback(&self, folder: Option<&str>, filename: &str) -> Result<Download> {
        validate_filename(filename).map_err(|v| rejected(filename, v, INVALID_FILENAME))?;
        let folder = folder.filter(|f| !f.is_empty()).map(checked_folder).transpose()?;

        let mut candidates = Vec::with_capacity(2);
        if let Some(folder) = folder {
            candidates.push(format!("{USER_DOWNLOADS}/{folder}/{filename}"));
        }
        candidates.push(format!("{DOWNLOADS}/{filename}"));

        for path in candidates {
            if self.storage.is_file(&path) {
                let content = self.storage.read(&path)?;
                return Ok(Download { path, content });
            }
        }

        Err(SyncError::NotFound(format!("File '{filename}'")))
    }

    /// Fetch the file at `path`, which must lie in the global downloads or
    /// in `folder`'s own download tree.
    pub fn download_exact(&self, path: &str, folder: Option<&str>) -> Result<Download> {
        validate_scoped(path, &["downloads/"]).map_err(|v| match v {
            PathViolation::OutsideScope => SyncError::Permission(FILE_ACCESS_DENIED.to_string()),
            other => rejected(path, other, INVALID_FILE_PATH),
        })?;

        if path.starts_with("downloads/users/") {
            let own = folder
                .filter(|f| !f.is_empty())
                .map(|f| format!("{USER_DOWNLOADS}/{f}/"));
            let allowed = own.is_some_and(|prefix| path.starts_with(&prefix));
            if !allowed {
                tracing::warn!(path = %path, folder = ?folder, "Download outside assigned folder");
                return Err(SyncError::Permission(FILE_ACCESS_DENIED.to_string()));
            }
        }

        if !self.storage.is_file(path) {
            return Err(SyncError::NotFound("File".to_string()));
        }
        let content = self.storage.read(path)?;
        Ok(Download {
            path: path.to_string(),
            content,
        })
    }

    /// Store every blob under `uploads/{folder}/`, returning the stored names.
    ///
    /// Blobs without a filename are skipped. All names are checked before the
    /// first write, so a rejected upload writes nothing.
    pub fn upload(&self, folder: &str, blobs: Vec<UploadBlob>) -> Result<Vec<String>> {
        let folder = checked_folder(folder)?;

        let blobs: Vec<UploadBlob> = blobs
            .into_iter()
            .filter(|b| !b.filename.is_empty())
            .collect();
        if blobs.is_empty() {
            return Err(SyncError::Validation(NO_FILES_PROVIDED.to_string()));
        }
        for blob in &blobs {
            validate_filename(&blob.filename)
                .map_err(|v| rejected(&blob.filename, v, INVALID_FILENAME))?;
        }

        let dir = format!("{UPLOADS}/{folder}");
        self.storage.create_dir_all(&dir)?;

        let mut stored = Vec::with_capacity(blobs.len());
        for blob in blobs {
            self.storage
                .write(&format!("{dir}/{}", blob.filename), &blob.content)?;
            stored.push(blob.filename);
        }
        Ok(stored)
    }

    /// Every upload folder that holds at least one file, with its filenames.
    pub fn list_all_uploads(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let mut uploads = BTreeMap::new();
        for folder in self.storage.list_dirs(UPLOADS)? {
            let files = self.storage.list_files(&format!("{UPLOADS}/{folder}"))?;
            if !files.is_empty() {
                uploads.insert(folder, files);
            }
        }
        Ok(uploads)
    }

    /// Write `content` at `target`, anywhere outside the upload and audit trees.
    pub fn sync_place(&self, target: &str, content: &[u8]) -> Result<()> {
        validate_unreserved(target, RESERVED_PREFIXES).map_err(|v| match v {
            PathViolation::Reserved => rejected(target, v, SYNC_TARGET_RESERVED),
            other => rejected(target, other, INVALID_TARGET_PATH),
        })?;

        if self.storage.is_dir(target) {
            return Err(SyncError::Validation(TARGET_IS_DIRECTORY.to_string()));
        }
        self.storage.write(target, content)?;
        Ok(())
    }

    /// Delete the file at `target`, which must lie in the upload or audit trees.
    pub fn sync_remove(&self, target: &str) -> Result<()> {
        validate_scoped(target, RESERVED_PREFIXES).map_err(|v| match v {
            PathViolation::OutsideScope => rejected(target, v, DELETE_OUTSIDE_RESERVED),
            other => rejected(target, other, INVALID_FILE_PATH),
        })?;

        if self.storage.is_dir(target) {
            return Err(SyncError::Validation(NOT_A_FILE.to_string()));
        }
        if !self.storage.is_file(target) {
            return Err(SyncError::NotFound("File".to_string()));
        }
        self.storage.remove_file(target)?;
        Ok(())
    }
}

//! Boundary operations.
//!
//! Each operation checks, in order: the bearer token, the role (for
//! management operations), then folder and path arguments. Storage is only
//! touched once all of those have passed. Every operation that reaches a
//! decision leaves one record in the audit log.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::auth::{CredentialStore, IssuedToken, Role, TokenClaims, TokenService};
use crate::config::Config;
use crate::file::store::INVALID_FOLDER_NAME;
use crate::file::{
    validate_folder_name, AuditLog, AuditOp, ChangeSet, ChangeSetComputer, Download, FileStore,
    LocalStorage, Storage, UploadBlob, DOWNLOADS,
};
use crate::{Result, SyncError};

/// Message returned when a regular subject calls a management operation.
pub const ACCESS_DENIED: &str = "Access denied.";

/// Version reported by the status operation.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A successful operation: a human-readable message plus its result.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    /// Human-readable outcome.
    pub message: String,
    /// Operation result.
    pub payload: T,
}

impl<T> Reply<T> {
    fn new(message: impl Into<String>, payload: T) -> Self {
        Self {
            message: message.into(),
            payload,
        }
    }
}

/// Files stored by an upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    /// Stored filenames.
    pub uploaded_files: Vec<String>,
    /// Folder the files went to.
    pub upload_folder: String,
}

/// Folder and login overview.
#[derive(Debug, Clone, Serialize)]
pub struct FolderOverview {
    /// Folders present under the downloads or uploads trees.
    pub existing_folders: Vec<String>,
    /// Subjects with the management role.
    pub management_users: Vec<String>,
    /// Whether restricted mode is active.
    pub restricted_mode: bool,
    /// Every configured subject.
    pub available_logins: Vec<String>,
}

/// Liveness information.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Crate version.
    pub version: &'static str,
    /// Server time, RFC 3339.
    pub timestamp: String,
}

/// The set of operations exposed to clients.
pub struct SyncGateway {
    tokens: TokenService,
    credentials: CredentialStore,
    files: FileStore,
    audit: AuditLog,
}

impl SyncGateway {
    /// Assemble a gateway from its parts.
    pub fn new(
        tokens: TokenService,
        credentials: CredentialStore,
        files: FileStore,
        audit: AuditLog,
    ) -> Self {
        Self {
            tokens,
            credentials,
            files,
            audit,
        }
    }

    /// Build a gateway over the local data root and prepare its layout.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(&config.storage.data_root)?);
        let credentials = CredentialStore::from_config(&config.auth.credentials);
        let files = FileStore::new(storage.clone());

        let regular = credentials.subjects_with_role(Role::Regular);
        files.prepare_layout(regular.iter().map(String::as_str))?;

        tracing::info!(
            data_root = %config.storage.data_root,
            credentials = credentials.len(),
            restricted = config.auth.restricted,
            "Sync gateway ready"
        );

        Ok(Self::new(
            TokenService::new(
                &config.auth.jwt_secret,
                config.auth.token_ttl_secs,
                config.auth.restricted,
            ),
            credentials,
            files,
            AuditLog::new(storage),
        ))
    }

    /// Token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// File store.
    pub fn files(&self) -> &FileStore {
        &self.files
    }

    /// Audit log.
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    fn require_management(&self, claims: &TokenClaims) -> Result<()> {
        if claims.role.is_management() {
            Ok(())
        } else {
            tracing::warn!(subject = %claims.sub, "Management operation refused");
            Err(SyncError::Permission(ACCESS_DENIED.to_string()))
        }
    }

    /// Verify a bearer token without running any operation.
    ///
    /// The web layer calls this before reading a request body, so bodies
    /// from unauthenticated callers are never buffered.
    pub fn authorize(&self, token: &str) -> Result<TokenClaims> {
        self.tokens.authenticate(token)
    }

    /// [`Self::authorize`] plus the management role check.
    pub fn authorize_management(&self, token: &str) -> Result<TokenClaims> {
        let claims = self.tokens.authenticate(token)?;
        self.require_management(&claims)?;
        Ok(claims)
    }

    /// Audit path rejections before handing the result back.
    fn audited<T>(&self, subject: &str, input: &str, result: Result<T>) -> Result<T> {
        if let Err(SyncError::PathRejected(reason)) = &result {
            self.audit
                .record(subject, AuditOp::PathRejected, format!("Input: {input}, {reason}"));
        }
        result
    }

    /// Authenticate a subject and issue a token for its assigned folder.
    pub fn issue_token(
        &self,
        subject: &str,
        secret: &str,
        requested_folder: Option<&str>,
    ) -> Result<Reply<IssuedToken>> {
        let role = match self.credentials.authenticate(subject, secret) {
            Ok(role) => role,
            Err(e) => {
                self.audit
                    .record(subject, AuditOp::AuthFailed, "Invalid credentials");
                return Err(e);
            }
        };

        let requested = requested_folder.filter(|f| !f.is_empty());
        if let Some(folder) = requested {
            let check = validate_folder_name(folder).map_err(|v| {
                tracing::warn!(subject = %subject, folder = %folder, reason = %v, "Rejected requested folder");
                SyncError::PathRejected(INVALID_FOLDER_NAME.to_string())
            });
            self.audited(subject, folder, check)?;
        }

        let issued = match self.tokens.issue(subject, role, requested) {
            Ok(issued) => issued,
            Err(e) => {
                self.audit.record(
                    subject,
                    AuditOp::AuthFailed,
                    "Restricted mode: can only access own folder",
                );
                return Err(e);
            }
        };

        self.files.ensure_folder(&issued.folder)?;

        self.audit.record(
            subject,
            AuditOp::AuthSuccess,
            format!(
                "Token generated for {}s, folder: {}",
                issued.expires_in, issued.folder
            ),
        );
        tracing::info!(subject = %subject, folder = %issued.folder, role = %role, "Token issued");

        let message = format!("Token valid for {} seconds.", issued.expires_in);
        Ok(Reply::new(message, issued))
    }

    /// Global downloads plus the files of the token's folder.
    pub fn list_downloads(&self, token: &str) -> Result<Reply<Vec<String>>> {
        let claims = self.tokens.authenticate(token)?;
        let folder = Some(claims.folder.as_str());

        let files = self.audited(&claims.sub, &claims.folder, self.files.list(folder))?;

        self.audit.record(
            &claims.sub,
            AuditOp::ListDownloads,
            format!("Found {} files, folder: {}", files.len(), claims.folder),
        );
        Ok(Reply::new("Files available for download.", files))
    }

    /// Fetch a bare filename, preferring the token's folder over the global files.
    pub fn download_fallback(&self, token: &str, filename: &str) -> Result<Reply<Download>> {
        let claims = self.tokens.authenticate(token)?;

        let result = self
            .files
            .download_with_fallback(Some(claims.folder.as_str()), filename);
        let download = match self.audited(&claims.sub, filename, result) {
            Ok(download) => download,
            Err(SyncError::NotFound(what)) => {
                self.audit.record(
                    &claims.sub,
                    AuditOp::DownloadAutoNotFound,
                    format!("File: {filename}"),
                );
                return Err(SyncError::NotFound(what));
            }
            Err(e) => return Err(e),
        };

        let origin = if download.path.starts_with(crate::file::USER_DOWNLOADS) {
            "User"
        } else {
            "Global"
        };
        self.audit.record(
            &claims.sub,
            AuditOp::DownloadAuto,
            format!("{origin} file: {}", download.path),
        );
        Ok(Reply::new("File downloaded.", download))
    }

    /// Fetch a file by its path under `downloads/`.
    pub fn download_exact(&self, token: &str, path: &str) -> Result<Reply<Download>> {
        let claims = self.tokens.authenticate(token)?;

        let result = self.files.download_exact(path, Some(claims.folder.as_str()));
        let download = self.audited(&claims.sub, path, result)?;

        self.audit
            .record(&claims.sub, AuditOp::Download, format!("File: {path}"));
        Ok(Reply::new("File downloaded.", download))
    }

    /// Store uploaded blobs in the token's upload folder.
    pub fn upload(&self, token: &str, blobs: Vec<UploadBlob>) -> Result<Reply<UploadReceipt>> {
        let claims = self.tokens.authenticate(token)?;
        let folder = claims.upload_folder().to_string();

        let names: Vec<String> = blobs.iter().map(|b| b.filename.clone()).collect();
        let result = self.files.upload(&folder, blobs);
        let uploaded_files = self.audited(&claims.sub, &names.join(", "), result)?;

        self.audit.record(
            &claims.sub,
            AuditOp::Upload,
            format!("Files: {uploaded_files:?}, folder: {folder}"),
        );
        Ok(Reply::new(
            "Files uploaded successfully.",
            UploadReceipt {
                uploaded_files,
                upload_folder: folder,
            },
        ))
    }

    /// Every non-empty upload folder with its files. Management only.
    pub fn list_uploads(&self, token: &str) -> Result<Reply<BTreeMap<String, Vec<String>>>> {
        let claims = self.authorize_management(token)?;

        let uploads = self.files.list_all_uploads()?;

        self.audit.record(
            &claims.sub,
            AuditOp::ListUploads,
            format!("Found uploads for {} folders", uploads.len()),
        );
        Ok(Reply::new("Upload files listed.", uploads))
    }

    /// Write a file at a server-side path. Management only.
    pub fn sync_place(&self, token: &str, target: &str, content: &[u8]) -> Result<Reply<String>> {
        let claims = self.authorize_management(token)?;

        let result = self.files.sync_place(target, content);
        self.audited(&claims.sub, target, result)?;

        self.audit
            .record(&claims.sub, AuditOp::SyncUpload, format!("File: {target}"));
        Ok(Reply::new("File synced successfully.", target.to_string()))
    }

    /// Delete a file from the upload or audit trees. Management only.
    pub fn sync_remove(&self, token: &str, target: &str) -> Result<Reply<()>> {
        let claims = self.authorize_management(token)?;

        let result = self.files.sync_remove(target);
        self.audited(&claims.sub, target, result)?;

        self.audit
            .record(&claims.sub, AuditOp::SyncDelete, format!("File: {target}"));
        Ok(Reply::new("File deleted successfully.", ()))
    }

    /// Change detection metadata for every file under `downloads/`. Management only.
    ///
    /// The walk runs on the blocking pool and is not interruptible.
    pub async fn metadata(&self, token: &str) -> Result<Reply<ChangeSet>> {
        let claims = self.authorize_management(token)?;

        let storage = self.files.storage().clone();
        let change_set = tokio::task::spawn_blocking(move || {
            ChangeSetComputer::new(storage.as_ref()).compute_tree(DOWNLOADS)
        })
        .await
        .map_err(|e| SyncError::Internal(format!("metadata walk failed: {e}")))?;

        for skipped in &change_set.skipped {
            self.audit.record(
                &claims.sub,
                AuditOp::MetadataError,
                format!("File: {}, Error: {}", skipped.path, skipped.error),
            );
        }
        self.audit.record(
            &claims.sub,
            AuditOp::MetadataRequest,
            format!("Files: {}", change_set.files.len()),
        );
        Ok(Reply::new("Metadata retrieved.", change_set))
    }

    /// Create a folder's download and upload trees. Management only.
    pub fn create_folder(&self, token: &str, name: &str) -> Result<Reply<String>> {
        let claims = self.authorize_management(token)?;

        let result = self.files.create_folder(name);
        self.audited(&claims.sub, name, result)?;

        self.audit.record(
            &claims.sub,
            AuditOp::CreateFolder,
            format!("Created folder: {name}"),
        );
        Ok(Reply::new(
            format!("Folder '{name}' created successfully."),
            name.to_string(),
        ))
    }

    /// Existing folders and configured logins. Needs no token.
    pub fn list_folders(&self) -> Result<Reply<FolderOverview>> {
        let overview = FolderOverview {
            existing_folders: self.files.existing_folders()?,
            management_users: self.credentials.subjects_with_role(Role::Management),
            restricted_mode: self.tokens.restricted(),
            available_logins: self.credentials.subjects(),
        };
        Ok(Reply::new("Available folders and info", overview))
    }

    /// Liveness information. Needs no token.
    pub fn status(&self) -> Reply<ServiceStatus> {
        Reply::new(
            "Sync API is running",
            ServiceStatus {
                version: VERSION,
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        )
    }
}

//! Append-only operation audit trail.
//!
//! One JSON line per operation in `logs/sync_YYYY-MM-DD.jsonl`. Failing to
//! write a record never fails the operation being recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::storage::Storage;

/// Directory holding audit files, relative to the data root.
pub const LOGS_DIR: &str = "logs";

/// Kinds of audited operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOp {
    AuthSuccess,
    AuthFailed,
    ListDownloads,
    DownloadAuto,
    DownloadAutoNotFound,
    Download,
    Upload,
    ListUploads,
    SyncUpload,
    SyncDelete,
    MetadataError,
    MetadataRequest,
    CreateFolder,
    PathRejected,
}

impl AuditOp {
    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOp::AuthSuccess => "AUTH_SUCCESS",
            AuditOp::AuthFailed => "AUTH_FAILED",
            AuditOp::ListDownloads => "LIST_DOWNLOADS",
            AuditOp::DownloadAuto => "DOWNLOAD_AUTO",
            AuditOp::DownloadAutoNotFound => "DOWNLOAD_AUTO_NOT_FOUND",
            AuditOp::Download => "DOWNLOAD",
            AuditOp::Upload => "UPLOAD",
            AuditOp::ListUploads => "LIST_UPLOADS",
            AuditOp::SyncUpload => "SYNC_UPLOAD",
            AuditOp::SyncDelete => "SYNC_DELETE",
            AuditOp::MetadataError => "METADATA_ERROR",
            AuditOp::MetadataRequest => "METADATA_REQUEST",
            AuditOp::CreateFolder => "CREATE_FOLDER",
            AuditOp::PathRejected => "PATH_REJECTED",
        }
    }
}

impl fmt::Display for AuditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// RFC 3339 timestamp.
    pub timestamp: String,
    /// Subject the operation was performed for.
    pub user_id: String,
    /// Operation kind.
    pub operation: AuditOp,
    /// Free-form detail.
    pub details: String,
}

/// Writes audit records through the shared storage.
#[derive(Clone)]
pub struct AuditLog {
    storage: Arc<dyn Storage>,
}

impl AuditLog {
    /// Create an audit log writing through `storage`.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Relative path of the audit file for the day of `at`.
    pub fn file_for(at: &DateTime<Utc>) -> String {
        format!("{LOGS_DIR}/sync_{}.jsonl", at.format("%Y-%m-%d"))
    }

    /// Append a record stamped with the current time.
    pub fn record(&self, user_id: &str, operation: AuditOp, details: impl Into<String>) {
        self.record_at(Utc::now(), user_id, operation, details);
    }

    /// Append a record stamped with `at`.
    pub fn record_at(
        &self,
        at: DateTime<Utc>,
        user_id: &str,
        operation: AuditOp,
        details: impl Into<String>,
    ) {
        let record = AuditRecord {
            timestamp: at.to_rfc3339(),
            user_id: user_id.to_string(),
            operation,
            details: details.into(),
        };

        let mut line = match serde_json::to_vec(&record) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize audit record");
                return;
            }
        };
        line.push(b'\n');

        if let Err(e) = self.storage.append(&Self::file_for(&at), &line) {
            tracing::warn!(
                error = %e,
                operation = %operation,
                user_id = %user_id,
                "Failed to write audit record"
            );
        }
    }

    /// Read back every record of the day of `at`. Unparsable lines are skipped.
    pub fn read_day(&self, at: &DateTime<Utc>) -> Vec<AuditRecord> {
        let Ok(content) = self.storage.read(&Self::file_for(at)) else {
            return Vec::new();
        };
        String::from_utf8_lossy(&content)
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }
}

//! File exchange module for termsync.
//!
//! This module provides:
//! - Path validation against traversal and root escape
//! - A storage seam over the data root
//! - Scoped download, upload and sync operations
//! - Change detection metadata for sync clients
//! - The daily operation audit log

pub mod audit;
pub mod changeset;
pub mod path_guard;
pub mod storage;
pub mod store;

pub use audit::{AuditLog, AuditOp, AuditRecord, LOGS_DIR};
pub use changeset::{content_digest, ChangeSet, ChangeSetComputer, FileRecord, SkippedEntry};
pub use path_guard::{
    validate_filename, validate_folder_name, validate_relative, validate_scoped,
    validate_unreserved, PathViolation, RESERVED_PREFIXES,
};
pub use storage::{FileStat, LocalStorage, Storage, WalkIssue};
pub use store::{Download, FileStore, UploadBlob, DOWNLOADS, UPLOADS, USER_DOWNLOADS};

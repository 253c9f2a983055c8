//! Change detection metadata.
//!
//! Walks a subtree and records size, modification time and a SHA-256 digest
//! per file so a sync client can diff against its own copy. Nothing is
//! cached; every call re-reads the files.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use super::storage::Storage;

/// Metadata for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    /// Size in bytes of the content that was hashed.
    pub size: u64,
    /// Modification time as fractional Unix seconds.
    pub mtime: f64,
    /// Lowercase hex SHA-256 of the full content.
    pub hash: String,
}

/// A file whose metadata could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Relative path.
    pub path: String,
    /// Error detail.
    pub error: String,
}

/// Result of a walk: computed records plus the files that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeSet {
    /// Records keyed by relative path.
    pub files: BTreeMap<String, FileRecord>,
    /// Per-file failures.
    pub skipped: Vec<SkippedEntry>,
}

/// Hex SHA-256 of `content`.
pub fn content_digest(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

/// Computes [`ChangeSet`]s over a storage.
pub struct ChangeSetComputer<'a> {
    storage: &'a dyn Storage,
}

impl<'a> ChangeSetComputer<'a> {
    /// Create a computer over `storage`.
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Compute metadata for every file below `subtree`.
    ///
    /// A file that vanishes or cannot be read is recorded in `skipped` and
    /// the walk continues.
    pub fn compute_tree(&self, subtree: &str) -> ChangeSet {
        let mut change_set = ChangeSet::default();

        for entry in self.storage.walk_files(subtree) {
            let path = match entry {
                Ok(path) => path,
                Err(issue) => {
                    change_set.skipped.push(SkippedEntry {
                        path: issue.path,
                        error: issue.detail,
                    });
                    continue;
                }
            };

            match self.record_for(&path) {
                Ok(record) => {
                    change_set.files.insert(path, record);
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Skipping file in metadata walk");
                    change_set.skipped.push(SkippedEntry {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        change_set
    }

    fn record_for(&self, path: &str) -> std::io::Result<FileRecord> {
        let stat = self.storage.stat(path)?;
        let content = self.storage.read(path)?;
        Ok(FileRecord {
            size: content.len() as u64,
            mtime: stat.mtime,
            hash: content_digest(&content),
        })
    }
}

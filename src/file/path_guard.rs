//! Validation of caller-supplied paths.
//!
//! Every path that reaches [`super::FileStore`] from outside passes through
//! one of these checks first. Accepted paths are canonical: `/`-separated,
//! relative, with no empty, `.` or `..` segments. That makes plain string
//! prefix checks on them equivalent to checks on the resolved location.

use thiserror::Error;

/// Prefixes owned by the upload and audit channels.
pub const RESERVED_PREFIXES: &[&str] = &["uploads/", "logs/"];

/// Why a path was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathViolation {
    /// Empty path.
    #[error("path is empty")]
    Empty,
    /// Starts at the filesystem root or a drive.
    #[error("path is absolute")]
    Absolute,
    /// Contains a `..` segment.
    #[error("path contains a parent-directory segment")]
    ParentSegment,
    /// Contains an empty or `.` segment, or a backslash.
    #[error("path is not in canonical form")]
    NonCanonical,
    /// Contains a NUL or other control character.
    #[error("path contains control characters")]
    ControlChar,
    /// A separator appeared where only a bare filename is allowed.
    #[error("path contains a separator")]
    Separator,
    /// Not under any of the allowed prefixes.
    #[error("path is outside the allowed prefixes")]
    OutsideScope,
    /// Under a prefix this operation must not touch.
    #[error("path targets a reserved prefix")]
    Reserved,
    /// Folder name with characters other than ASCII alphanumerics, `_` or `-`.
    #[error("invalid folder name")]
    InvalidFolderName,
}

/// Check that `path` is a canonical relative path under the data root.
pub fn validate_relative(path: &str) -> Result<(), PathViolation> {
    if path.is_empty() {
        return Err(PathViolation::Empty);
    }
    if path.chars().any(char::is_control) {
        return Err(PathViolation::ControlChar);
    }
    if path.starts_with('/') || path.starts_with('\\') || has_drive_prefix(path) {
        return Err(PathViolation::Absolute);
    }

    let mut non_canonical = path.contains('\\');
    for segment in path.split('/') {
        match segment {
            ".." => return Err(PathViolation::ParentSegment),
            "" | "." => non_canonical = true,
            _ => {}
        }
    }
    // A backslash can hide a `..` segment on platforms that treat it as a separator.
    if path.split(['/', '\\']).any(|s| s == "..") {
        return Err(PathViolation::ParentSegment);
    }
    if non_canonical {
        return Err(PathViolation::NonCanonical);
    }

    Ok(())
}

/// Check that `name` is a bare filename: a single canonical segment.
pub fn validate_filename(name: &str) -> Result<(), PathViolation> {
    validate_relative(name).map_err(|e| match e {
        PathViolation::NonCanonical if name.contains('\\') => PathViolation::Separator,
        other => other,
    })?;
    if name.contains('/') {
        return Err(PathViolation::Separator);
    }
    Ok(())
}

/// Check that `path` is relative and starts with one of `allowed`.
pub fn validate_scoped(path: &str, allowed: &[&str]) -> Result<(), PathViolation> {
    validate_relative(path)?;
    if allowed.iter().any(|prefix| path.starts_with(prefix)) {
        Ok(())
    } else {
        Err(PathViolation::OutsideScope)
    }
}

/// Check that `path` is relative and starts with none of `forbidden`.
pub fn validate_unreserved(path: &str, forbidden: &[&str]) -> Result<(), PathViolation> {
    validate_relative(path)?;
    if forbidden.iter().any(|prefix| path.starts_with(prefix)) {
        Err(PathViolation::Reserved)
    } else {
        Ok(())
    }
}

/// Check a folder name: non-empty, ASCII alphanumerics plus `_` and `-`.
pub fn validate_folder_name(name: &str) -> Result<(), PathViolation> {
    if !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err(PathViolation::InvalidFolderName)
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

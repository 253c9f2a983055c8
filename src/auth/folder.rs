//! Folder resolution.
//!
//! Decides which folder a subject's requests are scoped to. This is a pure
//! function of its inputs so it can be table-tested without transport or
//! storage.

use super::Role;

/// Outcome of folder resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderDecision {
    /// The request may operate on this folder.
    Assigned(String),
    /// Restricted mode refused the requested folder.
    Denied,
}

impl FolderDecision {
    /// The assigned folder, if any.
    pub fn folder(&self) -> Option<&str> {
        match self {
            FolderDecision::Assigned(folder) => Some(folder),
            FolderDecision::Denied => None,
        }
    }
}

/// Resolve the working folder for `subject`.
///
/// An empty `requested` is treated the same as no request.
///
/// 1. Management subjects get `requested`, or their own id. Never denied.
/// 2. In restricted mode, regular subjects get their own id; any other
///    requested folder is denied.
/// 3. Otherwise regular subjects get `requested`, or their own id.
pub fn resolve_folder(
    subject: &str,
    role: Role,
    requested: Option<&str>,
    restricted: bool,
) -> FolderDecision {
    let requested = requested.filter(|f| !f.is_empty());

    match (role, requested) {
        (Role::Management, Some(folder)) => FolderDecision::Assigned(folder.to_string()),
        (Role::Management, None) => FolderDecision::Assigned(subject.to_string()),
        (Role::Regular, Some(folder)) if restricted && folder != subject => {
            FolderDecision::Denied
        }
        (Role::Regular, _) if restricted => FolderDecision::Assigned(subject.to_string()),
        (Role::Regular, Some(folder)) => FolderDecision::Assigned(folder.to_string()),
        (Role::Regular, None) => FolderDecision::Assigned(subject.to_string()),
    }
}

//! Static credential set.

use std::collections::BTreeMap;

use super::{verify_secret, Role};
use crate::config::CredentialConfig;
use crate::{Result, SyncError};

/// Message returned for any credential failure.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// A configured login.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Subject id.
    pub subject: String,
    /// Argon2id PHC hash of the secret.
    pub secret_hash: String,
    /// Role granted on successful authentication.
    pub role: Role,
}

/// Immutable set of credentials loaded at startup.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    entries: BTreeMap<String, Credential>,
}

impl CredentialStore {
    /// Build a store from credentials. Later duplicates replace earlier ones;
    /// `Config::validate` rejects duplicates before this point.
    pub fn new(credentials: impl IntoIterator<Item = Credential>) -> Self {
        let entries = credentials
            .into_iter()
            .map(|c| (c.subject.clone(), c))
            .collect();
        Self { entries }
    }

    /// Build a store from the `[[auth.credentials]]` config entries.
    pub fn from_config(credentials: &[CredentialConfig]) -> Self {
        Self::new(credentials.iter().map(|c| Credential {
            subject: c.subject.clone(),
            secret_hash: c.secret_hash.clone(),
            role: c.role,
        }))
    }

    /// Check a (subject, secret) pair and return the subject's role.
    ///
    /// Unknown subjects and wrong secrets produce the same error.
    pub fn authenticate(&self, subject: &str, secret: &str) -> Result<Role> {
        let credential = self
            .entries
            .get(subject)
            .ok_or_else(|| SyncError::Auth(INVALID_CREDENTIALS.to_string()))?;

        verify_secret(secret, &credential.secret_hash).map_err(|e| {
            tracing::debug!(subject = %subject, error = %e, "Secret verification failed");
            SyncError::Auth(INVALID_CREDENTIALS.to_string())
        })?;

        Ok(credential.role)
    }

    /// All configured subject ids, sorted.
    pub fn subjects(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Subject ids with the given role, sorted.
    pub fn subjects_with_role(&self, role: Role) -> Vec<String> {
        self.entries
            .values()
            .filter(|c| c.role == role)
            .map(|c| c.subject.clone())
            .collect()
    }

    /// Number of configured credentials.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no credentials are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Secret hashing for the static credential set.
//!
//! Secrets are kept in configuration as Argon2id PHC strings.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;
use thiserror::Error;

/// Secret hashing errors.
#[derive(Error, Debug)]
pub enum SecretError {
    /// The secret to hash was empty.
    #[error("secret must not be empty")]
    Empty,

    /// Hashing failed.
    #[error("secret hashing failed: {0}")]
    HashError(String),

    /// Stored hash is not a PHC string.
    #[error("invalid secret hash format")]
    InvalidHash,

    /// Secret did not match.
    #[error("secret verification failed")]
    VerificationFailed,
}

/// Argon2id with 64 MB memory, 3 iterations, 4 lanes.
fn default_params() -> Result<Params, SecretError> {
    Params::new(65536, 3, 4, None).map_err(|e| SecretError::HashError(e.to_string()))
}

/// Hash a secret into a PHC string suitable for `secret_hash` in config.
///
/// ```
/// use termsync::auth::hash_secret;
///
/// let hash = hash_secret("sync_password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_secret(secret: &str) -> Result<String, SecretError> {
    hash_secret_with_params(secret, default_params()?)
}

/// Hash a secret with explicit Argon2id parameters.
pub fn hash_secret_with_params(secret: &str, params: Params) -> Result<String, SecretError> {
    if secret.is_empty() {
        return Err(SecretError::Empty);
    }

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| SecretError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a secret against a stored PHC hash.
///
/// Parameters are read from the hash itself, so hashes made with cheaper
/// parameters still verify.
pub fn verify_secret(secret: &str, hash: &str) -> Result<(), SecretError> {
    let parsed = PasswordHash::new(hash).map_err(|_| SecretError::InvalidHash)?;

    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .map_err(|_| SecretError::VerificationFailed)
}

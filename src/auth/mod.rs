//! Authentication and folder authorization.
//!
//! - `credentials`: static (subject, secret) set loaded from config
//! - `folder`: pure folder resolution, including restricted mode
//! - `password`: Argon2id secret hashing
//! - `role`: Regular / Management roles
//! - `token`: bearer token issuance and verification

pub mod credentials;
pub mod folder;
pub mod password;
pub mod role;
pub mod token;

pub use credentials::{Credential, CredentialStore, INVALID_CREDENTIALS};
pub use folder::{resolve_folder, FolderDecision};
pub use password::{hash_secret, hash_secret_with_params, verify_secret, SecretError};
pub use role::Role;
pub use token::{
    now_secs, IssuedToken, TokenClaims, TokenError, TokenService, INVALID_TOKEN,
    RESTRICTED_FOLDER_DENIED,
};

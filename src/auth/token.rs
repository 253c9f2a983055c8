//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the subject, its role and the folder it was
//! assigned at issuance. There is no server-side session: a token lives until
//! its `exp` and cannot be revoked or refreshed.

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{resolve_folder, FolderDecision, Role};
use crate::{Result, SyncError};

/// Message shown for every token failure. Sub-reasons are never exposed.
pub const INVALID_TOKEN: &str = "Invalid or expired token.";

/// Message shown when restricted mode refuses the requested folder.
pub const RESTRICTED_FOLDER_DENIED: &str =
    "In restricted mode, users can only access their own folder.";

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject id.
    pub sub: String,
    /// Role granted at issuance.
    pub role: Role,
    /// Folder assigned at issuance.
    pub folder: String,
    /// Issued at (Unix seconds).
    pub iat: u64,
    /// Expiry (Unix seconds).
    pub exp: u64,
    /// Token id.
    pub jti: String,
}

impl TokenClaims {
    /// Folder uploads go to: the assigned folder, or the subject id when empty.
    pub fn upload_folder(&self) -> &str {
        if self.folder.is_empty() {
            &self.sub
        } else {
            &self.folder
        }
    }
}

/// Why a token failed verification. Only ever logged, never shown.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Current time is at or past `exp`.
    #[error("token expired")]
    Expired,
    /// Not a decodable token.
    #[error("token malformed")]
    Malformed,
    /// Signature did not match the server secret.
    #[error("token signature invalid")]
    InvalidSignature,
}

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded bearer token.
    pub token: String,
    /// Folder assigned to the token.
    pub folder: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
    restricted: bool,
}

/// Current Unix time in seconds.
pub fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

impl TokenService {
    /// Create a service signing with `secret`.
    pub fn new(secret: &str, ttl_secs: u64, restricted: bool) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by hand so that `now == exp` already counts as expired.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
            restricted,
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Whether restricted folder mode is active.
    pub fn restricted(&self) -> bool {
        self.restricted
    }

    /// Issue a token for an already-authenticated subject.
    pub fn issue(&self, subject: &str, role: Role, requested: Option<&str>) -> Result<IssuedToken> {
        self.issue_at(subject, role, requested, now_secs())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: &str,
        role: Role,
        requested: Option<&str>,
        now: u64,
    ) -> Result<IssuedToken> {
        let folder = match resolve_folder(subject, role, requested, self.restricted) {
            FolderDecision::Assigned(folder) => folder,
            FolderDecision::Denied => {
                return Err(SyncError::Permission(RESTRICTED_FOLDER_DENIED.to_string()))
            }
        };

        let claims = TokenClaims {
            sub: subject.to_string(),
            role,
            folder: folder.clone(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to encode token: {}", e);
                SyncError::Internal("Failed to generate token".to_string())
            })?;

        Ok(IssuedToken {
            token,
            folder,
            expires_in: self.ttl_secs,
        })
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> std::result::Result<TokenClaims, TokenError> {
        self.verify_at(token, now_secs())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// The signature is checked first; a correctly signed token is then
    /// expired when `now >= exp`.
    pub fn verify_at(&self, token: &str, now: u64) -> std::result::Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;

        if now >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }

    /// Verify a token and collapse every failure into one auth error.
    pub fn authenticate(&self, token: &str) -> Result<TokenClaims> {
        self.verify(token).map_err(|e| {
            tracing::debug!(reason = %e, "Token rejected");
            SyncError::Auth(INVALID_TOKEN.to_string())
        })
    }
}

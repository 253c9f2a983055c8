//! Configuration module for termsync.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::auth::Role;
use crate::file::validate_folder_name;
use crate::{Result, SyncError};

/// Environment variable that overrides `auth.jwt_secret`.
pub const JWT_SECRET_ENV: &str = "TERMSYNC_JWT_SECRET";

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Rate limit for the token endpoint (requests per minute per client).
    #[serde(default = "default_token_rate_limit")]
    pub token_rate_limit: u32,
    /// Maximum request body size for uploads in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_token_rate_limit() -> u32 {
    30
}

fn default_max_upload_size() -> u64 {
    100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            token_rate_limit: default_token_rate_limit(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding `downloads/`, `uploads/` and `logs/`.
    #[serde(default = "default_data_root")]
    pub data_root: String,
}

fn default_data_root() -> String {
    "./dataroot".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
        }
    }
}

/// One static login entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialConfig {
    /// Subject id used as login name.
    pub subject: String,
    /// Argon2id PHC hash of the secret.
    pub secret_hash: String,
    /// Role granted to the subject.
    #[serde(default)]
    pub role: Role,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret.
    #[serde(default)]
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    /// When set, regular subjects may only use their own id as folder.
    #[serde(default)]
    pub restricted: bool,
    /// Static credential set.
    #[serde(default)]
    pub credentials: Vec<CredentialConfig>,
}

fn default_token_ttl() -> u64 {
    300 // 5 minutes
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
            restricted: false,
            credentials: vec![],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/termsync.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SyncError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SyncError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `TERMSYNC_JWT_SECRET`: Override the token signing secret
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
            if !secret.is_empty() {
                self.auth.jwt_secret = secret;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the signing secret is empty
    /// - the token lifetime is zero
    /// - a subject is not usable as a folder name
    /// - a subject is configured twice
    /// - a credential hash is not a valid PHC string
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(SyncError::Config(format!(
                "jwt_secret is not set. Set it in config.toml or via {JWT_SECRET_ENV}."
            )));
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(SyncError::Config(
                "token_ttl_secs must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for cred in &self.auth.credentials {
            if cred.subject.is_empty() {
                return Err(SyncError::Config("credential with empty subject".to_string()));
            }
            if validate_folder_name(&cred.subject).is_err() {
                return Err(SyncError::Config(format!(
                    "credential subject '{}' must use only letters, numbers, _ and -",
                    cred.subject
                )));
            }
            if !seen.insert(cred.subject.as_str()) {
                return Err(SyncError::Config(format!(
                    "duplicate credential subject: {}",
                    cred.subject
                )));
            }
            if argon2::password_hash::PasswordHash::new(&cred.secret_hash).is_err() {
                return Err(SyncError::Config(format!(
                    "credential '{}' has an invalid secret_hash",
                    cred.subject
                )));
            }
        }
        Ok(())
    }
}

//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use argon2::Params;
use axum::http::header::AUTHORIZATION;
use axum_test::{TestRequest, TestServer};
use serde_json::{json, Value};
use tempfile::TempDir;

use termsync::auth::{hash_secret_with_params, Role};
use termsync::config::{Config, CredentialConfig};
use termsync::web::handlers::AppState;
use termsync::web::middleware::RateLimitState;
use termsync::web::router::create_router;
use termsync::SyncGateway;

/// Secret shared by every test credential.
pub const SECRET: &str = "pass123";

/// Signing secret for test tokens.
pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Argon2id hash with minimal cost so tests stay fast.
pub fn cheap_hash(secret: &str) -> String {
    hash_secret_with_params(secret, Params::new(8, 1, 1, None).unwrap()).unwrap()
}

/// Configuration with terminals U001 and U002 and a management client.
pub fn test_config(root: &Path, restricted: bool) -> Config {
    let hash = cheap_hash(SECRET);
    let credential = |subject: &str, role: Role| CredentialConfig {
        subject: subject.to_string(),
        secret_hash: hash.clone(),
        role,
    };

    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.token_rate_limit = 1000;
    config.server.max_upload_size_mb = 1;
    config.storage.data_root = root.to_string_lossy().into_owned();
    config.auth.jwt_secret = JWT_SECRET.to_string();
    config.auth.restricted = restricted;
    config.auth.credentials = vec![
        credential("U001", Role::Regular),
        credential("U002", Role::Regular),
        credential("sync_client", Role::Management),
    ];
    config
}

/// Running test server plus the data root it serves.
pub struct TestApp {
    pub server: TestServer,
    pub dir: TempDir,
}

impl TestApp {
    /// Path of `rel` under the data root.
    pub fn path(&self, rel: &str) -> std::path::PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a file under the data root, creating parents.
    pub fn seed(&self, rel: &str, content: &[u8]) {
        let path = self.path(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// Request a token and return the response body.
    pub async fn token_body(&self, user: &str, password: &str, folder: Option<&str>) -> Value {
        let mut body = json!({ "user": user, "password": password });
        if let Some(folder) = folder {
            body["folder"] = json!(folder);
        }
        self.server.post("/api/v1/token").json(&body).await.json()
    }

    /// Request a token that must be granted.
    pub async fn token(&self, user: &str, folder: Option<&str>) -> String {
        let body = self.token_body(user, SECRET, folder).await;
        assert_eq!(body["error"], false, "token request failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }
}

/// Build an app with the given restricted flag and token rate limit.
pub fn create_app_with(restricted: bool, token_rate_limit: u32) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), restricted);
    config.server.token_rate_limit = token_rate_limit;

    let gateway = SyncGateway::from_config(&config).expect("gateway should build");
    let app_state = Arc::new(AppState::new(
        Arc::new(gateway),
        config.server.max_upload_size_mb,
    ));
    let rate_limit = Arc::new(RateLimitState::new(config.server.token_rate_limit));
    let router = create_router(app_state, rate_limit, &config.server.cors_origins);

    let server = TestServer::new(router).expect("Failed to create test server");
    TestApp { server, dir }
}

/// Build an app in open (unrestricted) mode.
pub fn create_app() -> TestApp {
    create_app_with(false, 1000)
}

/// Attach a bearer token to a request.
pub fn bearer(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(AUTHORIZATION, format!("Bearer {token}"))
}

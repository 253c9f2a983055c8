//! Web API sync tests
//!
//! Integration tests for the `/api/v1` endpoints, driven through the full
//! router with an on-disk data root.

mod common;

use axum::http::{header, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

use common::{bearer, create_app, create_app_with, SECRET};

fn file_part(name: &str, content: &[u8]) -> Part {
    Part::bytes(content.to_vec())
        .file_name(name)
        .mime_type("application/octet-stream")
}

fn assert_error(body: &Value, code: &str) {
    assert_eq!(body["error"], true, "expected an error body: {body}");
    assert_eq!(body["code"], code, "unexpected code: {body}");
}

// ============================================================================
// Token
// ============================================================================

#[tokio::test]
async fn test_token_success() {
    let app = create_app();

    let body = app.token_body("U001", SECRET, None).await;

    assert_eq!(body["error"], false);
    assert_eq!(body["user_folder"], "U001");
    assert_eq!(body["expires_in"], 300);
    assert_eq!(body["message"], "Token valid for 300 seconds.");
    assert!(body["token"].as_str().unwrap().len() > 20);

    // Issuing creates the folder's trees
    assert!(app.path("downloads/users/U001").is_dir());
    assert!(app.path("uploads/U001").is_dir());
}

#[tokio::test]
async fn test_token_wrong_secret() {
    let app = create_app();

    let response = app
        .server
        .post("/api/v1/token")
        .json(&json!({ "user": "U001", "password": "wrong" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_error(&body, "UNAUTHORIZED");
    assert_eq!(body["message"], "Invalid credentials.");
}

#[tokio::test]
async fn test_token_unknown_subject_same_message() {
    let app = create_app();

    let unknown = app.token_body("nobody", SECRET, None).await;
    let wrong = app.token_body("U001", "nope", None).await;

    assert_eq!(unknown["message"], wrong["message"]);
}

#[tokio::test]
async fn test_token_blank_fields_rejected() {
    let app = create_app();

    let response = app
        .server
        .post("/api/v1/token")
        .json(&json!({ "user": "  ", "password": "" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_error(&body, "VALIDATION_ERROR");
    assert!(body["details"]["user"].is_array());
}

#[tokio::test]
async fn test_token_requested_folder_open_mode() {
    let app = create_app();

    let body = app.token_body("U001", SECRET, Some("team-x")).await;

    assert_eq!(body["error"], false);
    assert_eq!(body["user_folder"], "team-x");
    assert!(app.path("uploads/team-x").is_dir());
}

#[tokio::test]
async fn test_token_requested_folder_must_be_a_name() {
    let app = create_app();

    let response = app
        .server
        .post("/api/v1/token")
        .json(&json!({ "user": "U001", "password": SECRET, "folder": "../etc" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_error(&response.json(), "INVALID_PATH");
    assert!(!app.path("etc").exists());
}

#[tokio::test]
async fn test_token_rate_limited() {
    let app = create_app_with(false, 2);

    for _ in 0..2 {
        app.server
            .post("/api/v1/token")
            .json(&json!({ "user": "U001", "password": "wrong" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    let response = app
        .server
        .post("/api/v1/token")
        .json(&json!({ "user": "U001", "password": SECRET }))
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_error(&response.json(), "RATE_LIMITED");

    // Other endpoints are not affected
    app.server.get("/api/v1/status").await.assert_status_ok();
}

// ============================================================================
// Token transport
// ============================================================================

#[tokio::test]
async fn test_missing_token() {
    let app = create_app();

    let response = app.server.get("/api/v1/downloads").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_error(&body, "UNAUTHORIZED");
    assert_eq!(body["message"], "Missing token parameter.");
}

#[tokio::test]
async fn test_garbage_token() {
    let app = create_app();

    let response = bearer(app.server.get("/api/v1/downloads"), "not-a-token").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Invalid or expired token.");
}

#[tokio::test]
async fn test_token_in_query_parameter() {
    let app = create_app();
    let token = app.token("U001", None).await;

    let response = app
        .server
        .get("/api/v1/downloads")
        .add_query_param("token", &token)
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let app = create_app();
    let other = termsync::TokenService::new("some-other-secret", 300, false)
        .issue("U001", termsync::Role::Regular, None)
        .unwrap();

    let response = bearer(app.server.get("/api/v1/downloads"), &other.token).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Downloads
// ============================================================================

#[tokio::test]
async fn test_list_downloads_scoped_to_folder() {
    let app = create_app();
    app.seed("downloads/global.txt", b"g");
    app.seed("downloads/users/U001/mine.txt", b"m");
    app.seed("downloads/users/U002/theirs.txt", b"t");
    let token = app.token("U001", None).await;

    let response = bearer(app.server.get("/api/v1/downloads"), &token).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["error"], false);
    assert_eq!(
        body["files"],
        json!(["downloads/global.txt", "downloads/users/U001/mine.txt"])
    );
}

#[tokio::test]
async fn test_download_auto_prefers_folder_copy() {
    let app = create_app();
    app.seed("downloads/config.txt", b"global");
    app.seed("downloads/users/U001/config.txt", b"personal");
    let u1 = app.token("U001", None).await;
    let u2 = app.token("U002", None).await;

    let response = bearer(app.server.get("/api/v1/download_auto"), &u1)
        .add_query_param("file", "config.txt")
        .await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"personal");
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "attachment; filename=\"config.txt\""
    );

    let response = bearer(app.server.get("/api/v1/download_auto"), &u2)
        .add_query_param("file", "config.txt")
        .await;
    assert_eq!(response.as_bytes().as_ref(), b"global");
}

#[tokio::test]
async fn test_download_auto_not_found() {
    let app = create_app();
    let token = app.token("U001", None).await;

    let response = bearer(app.server.get("/api/v1/download_auto"), &token)
        .add_query_param("file", "missing.txt")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_error(&body, "NOT_FOUND");
    assert_eq!(body["message"], "File 'missing.txt' not found.");
}

#[tokio::test]
async fn test_download_auto_rejects_paths() {
    let app = create_app();
    app.seed("secret.txt", b"do not serve");
    let token = app.token("U001", None).await;

    for file in ["../secret.txt", "users/U002/x.txt", "/etc/passwd"] {
        let response = bearer(app.server.get("/api/v1/download_auto"), &token)
            .add_query_param("file", file)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_error(&response.json(), "INVALID_PATH");
    }
}

#[tokio::test]
async fn test_download_missing_parameter() {
    let app = create_app();
    let token = app.token("U001", None).await;

    let response = bearer(app.server.get("/api/v1/download_auto"), &token).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Missing parameter: file");
}

#[tokio::test]
async fn test_download_exact() {
    let app = create_app();
    app.seed("downloads/users/U001/report.csv", b"a,b\n1,2\n");
    let token = app.token("U001", None).await;

    let response = bearer(app.server.get("/api/v1/download"), &token)
        .add_query_param("file", "downloads/users/U001/report.csv")
        .await;

    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"a,b\n1,2\n");
    assert_eq!(response.header(header::CONTENT_LENGTH), "8");
}

#[tokio::test]
async fn test_download_exact_other_folder_forbidden() {
    let app = create_app();
    app.seed("downloads/users/U002/private.txt", b"x");
    let token = app.token("U001", None).await;

    let response = bearer(app.server.get("/api/v1/download"), &token)
        .add_query_param("file", "downloads/users/U002/private.txt")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_error(&response.json(), "FORBIDDEN");
}

#[tokio::test]
async fn test_download_exact_outside_downloads_forbidden() {
    let app = create_app();
    app.seed("uploads/U002/report.txt", b"x");
    let token = app.token("U001", None).await;

    let response = bearer(app.server.get("/api/v1/download"), &token)
        .add_query_param("file", "uploads/U002/report.txt")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

// ============================================================================
// Uploads
// ============================================================================

#[tokio::test]
async fn test_upload_into_token_folder() {
    let app = create_app();
    let token = app.token("U001", None).await;

    let form = MultipartForm::new()
        .add_part("file", file_part("a.txt", b"alpha"))
        .add_part("other", file_part("b.bin", &[0, 1, 2]));
    let response = bearer(app.server.post("/api/v1/upload"), &token)
        .multipart(form)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["error"], false);
    assert_eq!(body["uploaded_files"], json!(["a.txt", "b.bin"]));
    assert_eq!(body["upload_folder"], "U001");
    assert_eq!(std::fs::read(app.path("uploads/U001/a.txt")).unwrap(), b"alpha");
    assert_eq!(std::fs::read(app.path("uploads/U001/b.bin")).unwrap(), [0, 1, 2]);
}

#[tokio::test]
async fn test_upload_without_files() {
    let app = create_app();
    let token = app.token("U001", None).await;

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = bearer(app.server.post("/api/v1/upload"), &token)
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "No files provided.");
}

#[tokio::test]
async fn test_upload_over_size_limit() {
    let app = create_app();
    let token = app.token("U001", None).await;

    let form = MultipartForm::new()
        .add_part("file", file_part("small.txt", b"s"))
        .add_part("file", file_part("big.bin", &vec![b'x'; 1024 * 1024 + 1]));
    let response = bearer(app.server.post("/api/v1/upload"), &token)
        .multipart(form)
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_error(&response.json(), "PAYLOAD_TOO_LARGE");
    assert!(!app.path("uploads/U001/small.txt").exists());
    assert!(!app.path("uploads/U001/big.bin").exists());
}

#[tokio::test]
async fn test_upload_garbage_token_before_body() {
    let app = create_app();

    // A body that would otherwise be refused with "No files provided."
    let form = MultipartForm::new().add_text("note", "no file here");
    let response = bearer(app.server.post("/api/v1/upload"), "not-a-token")
        .multipart(form)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Invalid or expired token.");
}

#[tokio::test]
async fn test_upload_overwrites() {
    let app = create_app();
    let token = app.token("U001", None).await;

    for content in [&b"first"[..], &b"second"[..]] {
        bearer(app.server.post("/api/v1/upload"), &token)
            .multipart(MultipartForm::new().add_part("file", file_part("same.txt", content)))
            .await
            .assert_status_ok();
    }

    assert_eq!(
        std::fs::read(app.path("uploads/U001/same.txt")).unwrap(),
        b"second"
    );
}

// ============================================================================
// Management operations
// ============================================================================

#[tokio::test]
async fn test_management_endpoints_refuse_regular_tokens() {
    let app = create_app();
    let token = app.token("U001", None).await;

    let responses = [
        bearer(app.server.get("/api/v1/uploads"), &token).await,
        bearer(app.server.get("/api/v1/file_metadata"), &token).await,
        bearer(app.server.post("/api/v1/sync_delete"), &token)
            .json(&json!({ "file": "uploads/U001/a.txt" }))
            .await,
        bearer(app.server.post("/api/v1/create_folder"), &token)
            .json(&json!({ "folder": "team-y" }))
            .await,
        bearer(app.server.post("/api/v1/sync_upload"), &token)
            .multipart(
                MultipartForm::new()
                    .add_text("target_path", "downloads/x.txt")
                    .add_part("file", file_part("x.txt", b"x")),
            )
            .await,
    ];

    for response in responses {
        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_error(&body, "FORBIDDEN");
        assert_eq!(body["message"], "Access denied.");
    }
    assert!(!app.path("downloads/x.txt").exists());
    assert!(!app.path("uploads/team-y").exists());
}

#[tokio::test]
async fn test_role_is_checked_before_path() {
    let app = create_app();
    let token = app.token("U001", None).await;

    let response = bearer(app.server.post("/api/v1/sync_delete"), &token)
        .json(&json!({ "file": "../../etc/passwd" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_is_checked_before_body() {
    let app = create_app();
    let regular = app.token("U001", None).await;
    let target_only = || MultipartForm::new().add_text("target_path", "downloads/x.txt");

    let response = app
        .server
        .post("/api/v1/sync_upload")
        .multipart(target_only())
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Missing token parameter.");

    let response = bearer(app.server.post("/api/v1/sync_upload"), "not-a-token")
        .multipart(target_only())
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Invalid or expired token.");

    // No file part: the role refusal wins over "No file provided."
    let response = bearer(app.server.post("/api/v1/sync_upload"), &regular)
        .multipart(target_only())
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["message"], "Access denied.");

    // Blank field would fail validation with 422.
    let response = bearer(app.server.post("/api/v1/sync_delete"), &regular)
        .json(&json!({ "file": "" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = bearer(app.server.post("/api/v1/create_folder"), &regular)
        .text("not json")
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = bearer(app.server.post("/api/v1/create_folder"), "not-a-token")
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sync_upload_over_size_limit() {
    let app = create_app();
    let token = app.token("sync_client", None).await;

    let form = MultipartForm::new()
        .add_text("target_path", "downloads/big.bin")
        .add_part("file", file_part("big.bin", &vec![b'x'; 1024 * 1024 + 1]));
    let response = bearer(app.server.post("/api/v1/sync_upload"), &token)
        .multipart(form)
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_error(&response.json(), "PAYLOAD_TOO_LARGE");
    assert!(!app.path("downloads/big.bin").exists());
}

#[tokio::test]
async fn test_sync_upload_reserved_target() {
    let app = create_app();
    let token = app.token("sync_client", None).await;

    for target in ["uploads/U001/x.txt", "logs/x.jsonl", "../outside.txt"] {
        let response = bearer(app.server.post("/api/v1/sync_upload"), &token)
            .multipart(
                MultipartForm::new()
                    .add_text("target_path", target)
                    .add_part("file", file_part("x.txt", b"x")),
            )
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_error(&response.json(), "INVALID_PATH");
    }
    assert!(!app.path("uploads/U001/x.txt").exists());
}

#[tokio::test]
async fn test_sync_upload_missing_fields() {
    let app = create_app();
    let token = app.token("sync_client", None).await;

    let response = bearer(app.server.post("/api/v1/sync_upload"), &token)
        .multipart(MultipartForm::new().add_part("file", file_part("x.txt", b"x")))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Missing parameter: target_path"
    );

    let response = bearer(app.server.post("/api/v1/sync_upload"), &token)
        .multipart(MultipartForm::new().add_text("target_path", "downloads/x.txt"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "No file provided.");
}

#[tokio::test]
async fn test_sync_delete_outside_reserved() {
    let app = create_app();
    app.seed("downloads/keep.txt", b"k");
    let token = app.token("sync_client", None).await;

    let response = bearer(app.server.post("/api/v1/sync_delete"), &token)
        .json(&json!({ "file": "downloads/keep.txt" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Can only delete from uploads or logs directories."
    );
    assert!(app.path("downloads/keep.txt").exists());
}

#[tokio::test]
async fn test_sync_delete_missing_file() {
    let app = create_app();
    let token = app.token("sync_client", None).await;

    let response = bearer(app.server.post("/api/v1/sync_delete"), &token)
        .json(&json!({ "file": "uploads/U001/never.txt" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_folder_invalid_name() {
    let app = create_app();
    let token = app.token("sync_client", None).await;

    for folder in ["../x", "a b", "team/y"] {
        let response = bearer(app.server.post("/api/v1/create_folder"), &token)
            .json(&json!({ "folder": folder }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_error(&response.json(), "INVALID_PATH");
    }
}

// ============================================================================
// Unauthenticated info
// ============================================================================

#[tokio::test]
async fn test_status() {
    let app = create_app();

    let response = app.server.get("/api/v1/status").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["error"], false);
    assert_eq!(body["message"], "Sync API is running");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_folders_overview() {
    let app = create_app_with(true, 1000);

    let response = app.server.get("/api/v1/folders").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["existing_folders"], json!(["U001", "U002"]));
    assert_eq!(body["management_users"], json!(["sync_client"]));
    assert_eq!(body["restricted_mode"], true);
    assert_eq!(
        body["available_logins"],
        json!(["U001", "U002", "sync_client"])
    );
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[tokio::test]
async fn test_management_round_trip() {
    let app = create_app();
    let sync = app.token("sync_client", None).await;

    // Publish a global file and a per-folder file
    for (target, content) in [
        ("downloads/global.txt", &b"hello"[..]),
        ("downloads/users/U001/personal.txt", &b"for U001"[..]),
    ] {
        let response = bearer(app.server.post("/api/v1/sync_upload"), &sync)
            .multipart(
                MultipartForm::new()
                    .add_text("target_path", target)
                    .add_part("file", file_part("ignored.txt", content)),
            )
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["path"], target);
    }

    // Metadata reflects both files
    let response = bearer(app.server.get("/api/v1/file_metadata"), &sync).await;
    response.assert_status_ok();
    let body: Value = response.json();
    let global = &body["metadata"]["downloads/global.txt"];
    assert_eq!(global["size"], 5);
    assert_eq!(
        global["hash"],
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    assert!(global["mtime"].as_f64().unwrap() > 0.0);
    assert!(body["metadata"]["downloads/users/U001/personal.txt"].is_object());
    assert_eq!(body["skipped"], json!([]));

    // A terminal sees both files and uploads a report
    let terminal = app.token("U001", None).await;
    let response = bearer(app.server.get("/api/v1/downloads"), &terminal).await;
    assert_eq!(
        response.json::<Value>()["files"],
        json!(["downloads/global.txt", "downloads/users/U001/personal.txt"])
    );
    bearer(app.server.post("/api/v1/upload"), &terminal)
        .multipart(MultipartForm::new().add_part("file", file_part("report.txt", b"done")))
        .await
        .assert_status_ok();

    // The sync client collects and removes it
    let response = bearer(app.server.get("/api/v1/uploads"), &sync).await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["uploads"],
        json!({ "U001": ["report.txt"] })
    );

    let response = bearer(app.server.post("/api/v1/sync_delete"), &sync)
        .json(&json!({ "file": "uploads/U001/report.txt" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["message"], "File deleted successfully.");
    assert!(!app.path("uploads/U001/report.txt").exists());

    // Emptied folders no longer show up
    let response = bearer(app.server.get("/api/v1/uploads"), &sync).await;
    assert_eq!(response.json::<Value>()["uploads"], json!({}));

    // The audit trail is there and can be pruned through the same channel
    let day = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let log_path = format!("logs/sync_{day}.jsonl");
    let log = std::fs::read_to_string(app.path(&log_path)).unwrap();
    for op in ["AUTH_SUCCESS", "SYNC_UPLOAD", "UPLOAD", "LIST_UPLOADS", "SYNC_DELETE"] {
        assert!(log.contains(op), "missing {op} in audit log");
    }
}

#[tokio::test]
async fn test_create_folder_is_listed() {
    let app = create_app();
    let sync = app.token("sync_client", None).await;

    let response = bearer(app.server.post("/api/v1/create_folder"), &sync)
        .json(&json!({ "folder": "team-y" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["folder"], "team-y");
    assert_eq!(body["message"], "Folder 'team-y' created successfully.");
    assert!(app.path("downloads/users/team-y").is_dir());
    assert!(app.path("uploads/team-y").is_dir());

    let response = app.server.get("/api/v1/folders").await;
    let folders = response.json::<Value>()["existing_folders"].clone();
    assert!(folders.as_array().unwrap().contains(&json!("team-y")));
}

#[tokio::test]
async fn test_restricted_mode_scenario() {
    let app = create_app_with(true, 1000);

    // Own folder is allowed, explicitly or implicitly
    assert_eq!(
        app.token_body("U001", SECRET, Some("U001")).await["user_folder"],
        "U001"
    );
    let token = app.token("U001", None).await;

    // Someone else's folder is refused
    let response = app
        .server
        .post("/api/v1/token")
        .json(&json!({ "user": "U001", "password": SECRET, "folder": "U002" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>()["message"],
        "In restricted mode, users can only access their own folder."
    );

    // Management is exempt
    assert_eq!(
        app.token_body("sync_client", SECRET, Some("U002")).await["user_folder"],
        "U002"
    );

    // The granted token still only reaches U001's files
    app.seed("downloads/users/U002/private.txt", b"x");
    let response = bearer(app.server.get("/api/v1/download"), &token)
        .add_query_param("file", "downloads/users/U002/private.txt")
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = bearer(app.server.get("/api/v1/download_auto"), &token)
        .add_query_param("file", "private.txt")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

//! Router configuration for the sync API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_folder, download, download_auto, file_metadata, issue_token, list_downloads,
    list_folders, list_uploads, status, sync_delete, sync_upload, upload, AppState,
};
use super::middleware::{create_cors_layer, token_rate_limit, RateLimitState};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    rate_limit: Arc<RateLimitState>,
    cors_origins: &[String],
) -> Router {
    // Token issuance is the only credential check, so it is rate limited
    let token_routes = Router::new()
        .route("/token", post(issue_token))
        .layer(middleware::from_fn(move |req, next| {
            let state = rate_limit.clone();
            token_rate_limit(state, req, next)
        }));

    // Bodies carrying files get the configured upload limit
    let upload_routes = Router::new()
        .route("/upload", post(upload))
        .route("/sync_upload", post(sync_upload))
        .layer(DefaultBodyLimit::max(app_state.max_upload_size));

    let api_routes = Router::new()
        .route("/downloads", get(list_downloads))
        .route("/download_auto", get(download_auto))
        .route("/download", get(download))
        .route("/uploads", get(list_uploads))
        .route("/sync_delete", post(sync_delete))
        .route("/file_metadata", get(file_metadata))
        .route("/create_folder", post(create_folder))
        .route("/folders", get(list_folders))
        .route("/status", get(status))
        .merge(token_routes)
        .merge(upload_routes);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

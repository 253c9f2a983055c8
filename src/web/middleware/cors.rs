//! CORS layer for browser-based sync tools.

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

const METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Create a CORS layer from the configured origins.
///
/// With no usable origin configured every origin is allowed, without
/// credentials. Otherwise only the listed origins are allowed, with
/// credentials and the headers the API reads.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    if parsed.len() < origins.len() {
        tracing::warn!(
            configured = origins.len(),
            usable = parsed.len(),
            "Ignoring unparsable CORS origins"
        );
    }

    if parsed.is_empty() {
        CorsLayer::new()
            .allow_methods(METHODS)
            .allow_headers(Any)
            .allow_origin(Any)
    } else {
        CorsLayer::new()
            .allow_methods(METHODS)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
            .allow_credentials(true)
            .allow_origin(parsed)
    }
}

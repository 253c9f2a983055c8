//! Rate limiting middleware for the token endpoint.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};

use crate::web::error::{ApiError, ErrorCode};

/// How often idle client entries are dropped.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Token requests allowed per client IP.
pub struct RateLimitState {
    limiter: DefaultKeyedRateLimiter<String>,
    requests_per_minute: u32,
}

impl RateLimitState {
    /// A zero limit is raised to one request per minute.
    pub fn new(requests_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            requests_per_minute,
        }
    }

    /// Configured requests per minute per client.
    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    /// Whether a request from `ip` is allowed, consuming one cell if so.
    pub fn check(&self, ip: &str) -> bool {
        self.limiter.check_key(&ip.to_string()).is_ok()
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Forget clients whose budget has fully refilled.
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Start a background task to periodically clean up old entries.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                self.cleanup();
                tracing::debug!(clients = self.tracked_clients(), "Token rate limiter swept");
            }
        });
    }
}

/// Extract client IP from request.
fn get_client_ip(req: &Request<Body>) -> String {
    // Reverse proxy headers first
    if let Some(forwarded) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    if let Some(real_ip) = req
        .headers()
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

/// Rate limiting middleware for the token endpoint.
pub async fn token_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = get_client_ip(&req);

    if !state.check(&ip) {
        tracing::warn!(ip = %ip, "Token rate limit exceeded");
        return ApiError::new(
            ErrorCode::RateLimited,
            "Too many token requests. Please try again later.",
        )
        .into_response();
    }

    next.run(req).await
}

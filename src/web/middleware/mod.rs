//! Middleware for the sync API.

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::{BearerToken, ManagementToken, VerifiedToken, MISSING_TOKEN};
pub use cors::create_cors_layer;
pub use rate_limit::{token_rate_limit, RateLimitState};

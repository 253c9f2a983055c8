//! HTTP surface for termsync.
//!
//! Thin axum handlers over [`crate::gateway::SyncGateway`]. Every JSON
//! response carries an `error` flag and a `message`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;

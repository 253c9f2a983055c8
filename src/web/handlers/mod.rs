//! API handlers for the sync API.

pub mod files;
pub mod info;
pub mod sync;
pub mod token;

pub use files::*;
pub use info::*;
pub use sync::*;
pub use token::*;

use std::sync::Arc;

use crate::gateway::SyncGateway;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Boundary operations.
    pub gateway: Arc<SyncGateway>,
    /// Maximum upload body size in bytes.
    pub max_upload_size: usize,
}

impl AppState {
    /// Create a new application state.
    pub fn new(gateway: Arc<SyncGateway>, max_upload_size_mb: u64) -> Self {
        Self {
            gateway,
            max_upload_size: (max_upload_size_mb as usize).saturating_mul(1024 * 1024),
        }
    }
}

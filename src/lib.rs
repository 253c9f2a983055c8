//! termsync - file exchange server for terminals and a sync client.
//!
//! Terminals authenticate with a static credential, receive a short-lived
//! bearer token bound to a folder, then download and upload files within
//! that folder. A management client mirrors the download tree and collects
//! uploads through a privileged sync channel.

pub mod auth;
pub mod config;
pub mod error;
pub mod file;
pub mod gateway;
pub mod logging;
pub mod web;

pub use auth::{hash_secret, verify_secret, Role, TokenClaims, TokenService};
pub use config::Config;
pub use error::{Result, SyncError};
pub use gateway::{Reply, SyncGateway};
pub use web::WebServer;

//! Web server for termsync.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{Config, ServerConfig};
use crate::gateway::SyncGateway;
use crate::{Result, SyncError};

use super::handlers::AppState;
use super::middleware::RateLimitState;
use super::router::{create_health_router, create_router};

/// Web server for the sync API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Token endpoint limiter.
    rate_limit: Arc<RateLimitState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a web server around an existing gateway.
    pub fn new(config: &ServerConfig, gateway: Arc<SyncGateway>) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| {
                SyncError::Config(format!(
                    "invalid server address {}:{}: {e}",
                    config.host, config.port
                ))
            })?;

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(gateway, config.max_upload_size_mb)),
            rate_limit: Arc::new(RateLimitState::new(config.token_rate_limit)),
            cors_origins: config.cors_origins.clone(),
        })
    }

    /// Build the gateway from the full configuration and wrap it.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gateway = SyncGateway::from_config(config)?;
        Self::new(&config.server, Arc::new(gateway))
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The complete application router.
    pub fn router(&self) -> Router {
        create_router(
            self.app_state.clone(),
            self.rate_limit.clone(),
            &self.cors_origins,
        )
        .merge(create_health_router())
    }

    async fn bind(self) -> std::io::Result<(TcpListener, Router, SocketAddr)> {
        let router = self.router();
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        // Only start the limiter sweep once the port is ours
        self.rate_limit.start_cleanup_task();

        tracing::info!("Web server listening on http://{}", local_addr);
        Ok((listener, router, local_addr))
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> std::io::Result<()> {
        let (listener, router, _) = self.bind().await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Binding to port 0 picks a free port, which tests rely on.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let (listener, router, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

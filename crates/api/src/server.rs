//! Server configuration and startup.

use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Bind address of the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` bind string.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP server serving the position API.
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Creates a new API server.
    #[must_use]
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Runs the server until Ctrl-C.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound or serving fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.bind_address()).await?;
        let addr: SocketAddr = listener.local_addr()?;
        info!(%addr, "Starting API server");

        axum::serve(listener, create_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9100,
        };
        assert_eq!(config.bind_address(), "127.0.0.1:9100");
        assert_eq!(ServerConfig::default().bind_address(), "0.0.0.0:8000");
    }
}

//! Read-only monitoring API
//!
//! Serves the monitoring artifacts over HTTP. The server never computes or
//! mutates anything; it only reads the JSON files the pipeline stages wrote.

mod api;
mod error;
mod handlers;

pub use api::create_router;
pub use error::ServerError;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::MonitorConfig;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
        }
    }
}

/// Shared state: where the artifacts live
pub struct AppState {
    pub monitor_config: MonitorConfig,
}

/// Run the monitoring API until interrupted
pub async fn serve(config: ServerConfig, monitor_config: MonitorConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState { monitor_config });
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(%addr, "monitoring API listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

//! sw-host entry point.
//!
//! Boots the offline cache controller behind an MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use swcache_client::{CacheController, ControllerConfig, FetchClient, FetchConfig};
use swcache_core::{AppConfig, CacheDb};
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let controller_config = ControllerConfig::from_app_config(&config)?;
    let storage = CacheDb::open(&config.db_path).await?;
    let network = FetchClient::new(FetchConfig::from(&config))?;

    tracing::info!(
        origin = %controller_config.origin,
        db_path = %config.db_path.display(),
        static_cache = %controller_config.generations.static_cache,
        dynamic_cache = %controller_config.generations.dynamic_cache,
        "Starting sw-host on stdio transport"
    );

    let controller = Arc::new(CacheController::new(storage, network, controller_config));
    let handler = handler::SwHost::new(controller);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

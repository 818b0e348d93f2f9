//! Google Search MCP Server
//!
//! Serves the `search_google` tool over streamable HTTP at `/mcp/`.
//!
//! # Configuration
//! Set `GOOGLE_API_KEY` and `GOOGLE_CSE_ID`, optionally `HTTP_HOST`, `HTTP_PORT`,
//! `ENABLE_AUTH` and `API_TOKEN` (environment or `.env`).

use std::sync::Arc;

use google_search_mcp::{transport, Gateway, GatewayConfig, GoogleSearchMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mcp_common::init_tracing("google_search_mcp")?;

    tracing::info!("Starting Google Search MCP server with Streamable HTTP transport");

    let config = Arc::new(GatewayConfig::load()?);

    match config.auth.masked_token() {
        Some(masked) => {
            tracing::info!("Authentication: ENABLED (Bearer Token required)");
            tracing::info!("API Token: {}", masked);
        }
        None => tracing::warn!("Authentication: DISABLED (insecure mode)"),
    }

    let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
    let gateway = Gateway::google(Arc::clone(&config))?;
    tracing::info!(
        "Provider: {} (max_results={}, timeout={}s)",
        gateway.provider().name(),
        config.provider.max_results,
        config.provider.timeout_seconds
    );

    let server = GoogleSearchMcpServer::new(gateway);

    transport::serve(listener, server, transport::shutdown_signal()).await?;

    tracing::info!("Server shutting down");
    Ok(())
}

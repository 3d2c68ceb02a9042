//! Website Info MCP Server
//!
//! Fetches websites and extracts structured content for MCP clients.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use website_info::config::{Config, Transport};
use website_info::extraction::Dispatcher;
use website_info::mcp::McpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    // stdout carries MCP traffic on the stdio transport, so logs go to stderr
    let default_filter = if config.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let extractor_config = config.extractor_config();
    if !extractor_config.uses_remote() {
        tracing::warn!("AGENTQL_API_KEY not set; pages will be fetched and parsed directly");
    }

    let dispatcher =
        Dispatcher::new(&extractor_config).context("failed to build HTTP client")?;
    let server = Arc::new(McpServer::new(dispatcher));

    match config.transport {
        Transport::Stdio => server.run().await.context("stdio transport failed")?,
        Transport::Http => {
            let addr = config.bind_addr();
            tracing::info!("Website Info MCP Server starting on {}", addr);
            website_info::http::serve(server, &addr)
                .await
                .with_context(|| format!("HTTP transport failed on {}", addr))?
        }
    }

    Ok(())
}

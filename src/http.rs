//! HTTP transport for the MCP server
//!
//! - `POST /mcp` - one JSON-RPC request per body; notifications get `202`
//! - `GET /health` - liveness probe

use crate::cors::cors_layer;
use crate::error::Result;
use crate::mcp::McpServer;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" if responding
    pub status: String,
    /// Crate version
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Build the router
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/mcp", post(mcp_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer())
        .with_state(server)
}

/// Bind and serve until the process is stopped
pub async fn serve(server: Arc<McpServer>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("MCP HTTP transport listening on {}", listener.local_addr()?);
    axum::serve(listener, router(server)).await?;
    Ok(())
}

async fn mcp_handler(State(server): State<Arc<McpServer>>, body: String) -> Response {
    debug!("Received: {}", body);
    match server.handle_line(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

//! # Website Info - Server Check
//!
//! Drives an in-process MCP server through a short session and prints every
//! exchange.
//!
//! Run with: `cargo run --example check_server -- example.com`

use serde_json::{json, Value};
use website_info::config::ExtractorConfig;
use website_info::extraction::Dispatcher;
use website_info::mcp::{McpServer, WEBSITE_INFO_URI};

async fn exchange(server: &McpServer, request: Value) -> Result<(), Box<dyn std::error::Error>> {
    println!(">> {}", request);
    match server.handle_line(&request.to_string()).await {
        Some(response) => println!("<< {}", serde_json::to_string_pretty(&response)?),
        None => println!("<< (notification, no response)"),
    }
    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "example.com".to_string());

    let mut config = ExtractorConfig::default();
    if let Ok(key) = std::env::var("AGENTQL_API_KEY") {
        config = config.with_api_key(key);
    }
    let server = McpServer::new(Dispatcher::new(&config)?);

    let session = [
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "clientInfo": { "name": "check_server", "version": "1.0.0" }
            }
        }),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": { "name": "fetch_website", "arguments": { "url": url } }
        }),
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "resources/read",
            "params": {
                "uri": WEBSITE_INFO_URI,
                "params": { "url": url, "selectors_json": "{\"headings\": \"h1\"}" }
            }
        }),
    ];

    for request in session {
        exchange(&server, request).await?;
    }

    println!("Server check completed");
    Ok(())
}

//! MCP server implementation
//!
//! This module implements the MCP server, handling JSON-RPC requests and
//! dispatching them to the registered tools and the `website://info`
//! resource. [`McpServer::run`] serves newline-delimited JSON-RPC over
//! stdio; the HTTP transport in [`crate::http`] reuses
//! [`McpServer::handle_line`].

use crate::error::{Error, McpError, Result};
use crate::extraction::{Dispatcher, ExtractionRequest};
use crate::mcp::tools::ToolRegistry;
use crate::mcp::types::{
    JsonRpcRequest, JsonRpcResponse, McpCapabilities, McpResourceDefinition, McpServerInfo,
    ResourceContent, ResourceReadParams, ToolCallParams, PROTOCOL_VERSION,
};
use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// URI of the website information resource
pub const WEBSITE_INFO_URI: &str = "website://info";

/// MCP server state
pub struct McpServer {
    /// Tool registry
    tools: ToolRegistry,
    /// Server info
    info: McpServerInfo,
    /// Whether the server has been initialized
    initialized: RwLock<bool>,
}

impl McpServer {
    /// Create a new MCP server around an extraction dispatcher
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            tools: ToolRegistry::new(dispatcher),
            info: McpServerInfo::default(),
            initialized: RwLock::new(false),
        }
    }

    /// Server name and version
    pub fn info(&self) -> &McpServerInfo {
        &self.info
    }

    /// Whether `initialize` has been received (and no `shutdown` since)
    pub async fn is_initialized(&self) -> bool {
        *self.initialized.read().await
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout until EOF
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting MCP server: {} v{} (stdio)",
            self.info.name, self.info.version
        );

        let mut lines = BufReader::new(io::stdin()).lines();
        let mut stdout = io::stdout();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(l)) => l,
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read line: {}", e);
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            if let Some(resp) = self.handle_line(&line).await {
                let json = serde_json::to_string(&resp).unwrap_or_else(|e| {
                    error!("Failed to serialize response: {}", e);
                    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"}}"#
                        .to_string()
                });

                debug!("Sending: {}", json);

                if let Err(e) = stdout.write_all(format!("{}\n", json).as_bytes()).await {
                    error!("Failed to write response: {}", e);
                }
                if let Err(e) = stdout.flush().await {
                    error!("Failed to flush stdout: {}", e);
                }
            }
        }

        info!("MCP server shutting down");
        Ok(())
    }

    /// Handle a single line of input
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::parse_error());
            }
        };

        self.handle_request(request).await
    }

    /// Handle a JSON-RPC request
    #[instrument(skip(self, request), fields(method = %request.method))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone();
        let method = request.method.as_str();

        info!("Handling method: {}", method);

        let result = match method {
            // Lifecycle methods
            "initialize" => self.handle_initialize(request.params).await,
            "initialized" | "notifications/initialized" => {
                // Notification, no response needed
                return None;
            }
            "shutdown" => self.handle_shutdown().await,

            // Tool methods
            "tools/list" => self.handle_tools_list().await,
            "tools/call" => self.handle_tools_call(request.params).await,

            // Resource methods
            "resources/list" => self.handle_resources_list().await,
            "resources/read" => self.handle_resources_read(request.params).await,

            "ping" => Ok(json!({ "pong": true })),

            _ => {
                warn!("Unknown method: {}", method);
                return Some(JsonRpcResponse::method_not_found(id, method));
            }
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(Error::Mcp(e @ (McpError::InvalidParams(_) | McpError::ResourceNotFound(_)))) => {
                JsonRpcResponse::invalid_params(id, &e.to_string())
            }
            Err(e) => JsonRpcResponse::internal_error(id, &e.to_string()),
        })
    }

    /// Handle initialize request
    async fn handle_initialize(&self, params: Option<Value>) -> Result<Value> {
        if let Some(version) = params
            .as_ref()
            .and_then(|p| p.get("protocolVersion"))
            .and_then(|v| v.as_str())
        {
            debug!("Client protocol version: {}", version);
        }

        *self.initialized.write().await = true;

        Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": McpCapabilities::default(),
            "serverInfo": self.info
        }))
    }

    /// Handle shutdown request
    async fn handle_shutdown(&self) -> Result<Value> {
        info!("Handling shutdown");
        *self.initialized.write().await = false;
        Ok(json!(null))
    }

    /// Handle tools/list request
    async fn handle_tools_list(&self) -> Result<Value> {
        Ok(json!({
            "tools": self.tools.definitions()
        }))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, params: Option<Value>) -> Result<Value> {
        let params =
            params.ok_or_else(|| McpError::InvalidParams("missing params".to_string()))?;

        let tool_params: ToolCallParams = serde_json::from_value(params)
            .map_err(|e| McpError::InvalidParams(e.to_string()))?;

        let result = self
            .tools
            .execute(&tool_params.name, tool_params.arguments)
            .await;

        Ok(serde_json::to_value(result)?)
    }

    /// Handle resources/list request
    async fn handle_resources_list(&self) -> Result<Value> {
        let resource = McpResourceDefinition {
            uri: WEBSITE_INFO_URI.to_string(),
            name: "Website Information".to_string(),
            description: "Extracts and parses information from websites".to_string(),
            mime_type: "application/json".to_string(),
        };
        Ok(json!({ "resources": [resource] }))
    }

    /// Handle resources/read request
    ///
    /// `params.params` carries `{url, selectors_json?}`; selectors present
    /// routes to `extract_content`, otherwise `fetch_website`.
    async fn handle_resources_read(&self, params: Option<Value>) -> Result<Value> {
        let params =
            params.ok_or_else(|| McpError::InvalidParams("missing params".to_string()))?;

        let read: ResourceReadParams = serde_json::from_value(params)
            .map_err(|e| McpError::InvalidParams(e.to_string()))?;

        if read.uri != WEBSITE_INFO_URI {
            return Err(McpError::ResourceNotFound(read.uri).into());
        }

        let request = match read.params {
            None | Some(Value::Null) => ExtractionRequest::default(),
            Some(p) => serde_json::from_value::<ExtractionRequest>(p)
                .map_err(|e| McpError::InvalidParams(e.to_string()))?,
        };

        let result = self.tools.dispatcher().dispatch(&request).await;

        let content = ResourceContent {
            uri: read.uri,
            mime_type: "application/json".to_string(),
            text: serde_json::to_string_pretty(&result)?,
        };

        Ok(json!({ "contents": [content] }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;

    fn server() -> McpServer {
        McpServer::new(Dispatcher::new(&ExtractorConfig::default()).unwrap())
    }

    fn request(method: &str, params: Option<Value>, id: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id,
        }
    }

    #[tokio::test]
    async fn test_mcp_server_new() {
        let server = server();
        assert_eq!(server.info().name, "website-info-mcp");
        assert!(!server.is_initialized().await);
    }

    #[tokio::test]
    async fn test_handle_ping() {
        let response = server()
            .handle_request(request("ping", None, Some(json!(1))))
            .await
            .unwrap();
        assert!(response.result.unwrap()["pong"].as_bool().unwrap());
    }

    #[tokio::test]
    async fn test_handle_initialize_and_shutdown() {
        let server = server();
        let response = server
            .handle_request(request(
                "initialize",
                Some(json!({ "protocolVersion": "2024-11-05" })),
                Some(json!(1)),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(result["capabilities"]["resources"].is_object());
        assert_eq!(result["serverInfo"]["name"], "website-info-mcp");
        assert!(server.is_initialized().await);

        server
            .handle_request(request("shutdown", None, Some(json!(2))))
            .await
            .unwrap();
        assert!(!server.is_initialized().await);
    }

    #[tokio::test]
    async fn test_handle_tools_list() {
        let response = server()
            .handle_request(request("tools/list", None, Some(json!(2))))
            .await
            .unwrap();
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert!(names.contains(&"fetch_website"));
        assert!(names.contains(&"extract_content"));
    }

    #[tokio::test]
    async fn test_handle_resources_list() {
        let response = server()
            .handle_request(request("resources/list", None, Some(json!(3))))
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["resources"][0]["uri"], WEBSITE_INFO_URI);
    }

    #[tokio::test]
    async fn test_resources_read_missing_url() {
        let response = server()
            .handle_request(request(
                "resources/read",
                Some(json!({ "uri": WEBSITE_INFO_URI, "params": {} })),
                Some(json!(4)),
            ))
            .await
            .unwrap();

        let text = response.result.unwrap()["contents"][0]["text"]
            .as_str()
            .unwrap()
            .to_string();
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "URL parameter is required");
    }

    #[tokio::test]
    async fn test_resources_read_unknown_uri() {
        let response = server()
            .handle_request(request(
                "resources/read",
                Some(json!({ "uri": "website://other" })),
                Some(json!(5)),
            ))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_tools_call_without_params() {
        let response = server()
            .handle_request(request("tools/call", None, Some(json!(6))))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_handle_unknown_method() {
        let response = server()
            .handle_request(request("unknown/method", None, Some(json!(3))))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_handle_notification() {
        let response = server()
            .handle_request(request("initialized", None, None))
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_handle_line_parse_error() {
        let response = server().handle_line("{not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, -32700);
    }
}

//! Model Context Protocol (MCP) server module
//!
//! This module implements the MCP server for AI agent integration,
//! exposing `fetch_website`, `extract_content` and the `website://info`
//! resource.

mod server;
mod tools;
/// MCP protocol types
pub mod types;

pub use server::{McpServer, WEBSITE_INFO_URI};
pub use tools::{to_tool_result, McpTool, ToolRegistry, AVAILABLE_TOOLS};
pub use types::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpCapabilities, McpResourceDefinition,
    McpServerInfo, McpToolDefinition, ToolCallParams, ToolCallResult, ToolContent,
};

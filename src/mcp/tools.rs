//! MCP tool definitions and registry
//!
//! This module defines the available MCP tools and routes calls to the
//! extraction [`Dispatcher`].

use crate::error::McpError;
use crate::extraction::{Dispatcher, ExtractionResult};
use crate::mcp::types::{McpToolDefinition, ToolCallResult};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// A registered MCP tool
pub trait McpTool: Send + Sync {
    /// Tool name
    fn name(&self) -> &str;
    /// Tool description
    fn description(&self) -> &str;
    /// Input schema as JSON
    fn input_schema(&self) -> Value;
    /// Get tool definition
    fn definition(&self) -> McpToolDefinition {
        McpToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool registry holding all available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn McpTool>>,
    dispatcher: Dispatcher,
}

impl ToolRegistry {
    /// Create a registry with the built-in tools
    pub fn new(dispatcher: Dispatcher) -> Self {
        let mut registry = Self {
            tools: BTreeMap::new(),
            dispatcher,
        };

        registry.register(Box::new(FetchWebsiteTool));
        registry.register(Box::new(ExtractContentTool));

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Box<dyn McpTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<McpToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// The dispatcher tools run against
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Execute a tool by name
    #[instrument(skip(self, args))]
    pub async fn execute(&self, name: &str, args: Value) -> ToolCallResult {
        info!("Executing tool: {}", name);

        if !self.tools.contains_key(name) {
            return ToolCallResult::error(McpError::ToolNotFound(name.to_string()).to_string());
        }

        let url = match args.get("url").and_then(|v| v.as_str()) {
            Some(u) => u,
            None => return ToolCallResult::error("Missing required parameter: url"),
        };

        let result = match name {
            "fetch_website" => self.dispatcher.fetch_website(url).await,
            "extract_content" => {
                let selectors = args.get("selectors_json").and_then(|v| v.as_str());
                self.dispatcher.extract_content(url, selectors).await
            }
            _ => return ToolCallResult::error(format!("Unknown tool: {}", name)),
        };

        to_tool_result(&result)
    }
}

/// Render an extraction result as tool output
pub fn to_tool_result(result: &ExtractionResult) -> ToolCallResult {
    let text = serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string());
    if result.is_success() {
        ToolCallResult::text(text)
    } else {
        ToolCallResult::error(text)
    }
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Fetch and summarize a page
struct FetchWebsiteTool;

impl McpTool for FetchWebsiteTool {
    fn name(&self) -> &str {
        "fetch_website"
    }

    fn description(&self) -> &str {
        "Fetches and parses content from a website URL using AgentQL"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the website to fetch"
                }
            },
            "required": ["url"]
        })
    }
}

/// Extract fields by CSS selector
struct ExtractContentTool;

impl McpTool for ExtractContentTool {
    fn name(&self) -> &str {
        "extract_content"
    }

    fn description(&self) -> &str {
        "Extracts specific content from a website using CSS selectors"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the website to parse"
                },
                "selectors_json": {
                    "type": "string",
                    "description": "CSS selectors to extract specific content as JSON string"
                }
            },
            "required": ["url"]
        })
    }
}

/// List of all available tools (for documentation)
pub const AVAILABLE_TOOLS: &[&str] = &["fetch_website", "extract_content"];

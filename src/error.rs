//! Error types for Website Info
//!
//! This module provides the error hierarchy used across the crate. Extraction
//! operations never surface these to MCP clients directly: the dispatcher
//! folds them into an error [`ExtractionResult`](crate::extraction::ExtractionResult).

use thiserror::Error;

/// The main error type for Website Info operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure (DNS, connect, timeout, body decode)
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the target page or extraction API
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (may be empty)
        body: String,
    },

    /// The extraction API reported an error indicator
    #[error("{0}")]
    Remote(String),

    /// Content extraction errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// MCP protocol errors
    #[error("MCP error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Unknown resource URI
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Tool not found
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
}

/// Content extraction errors
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// CSS selector failed to parse
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// Selector text as supplied
        selector: String,
        /// Parser message
        reason: String,
    },

    /// Extraction API answered without a `data` object
    #[error("Response missing data object")]
    MissingData,
}

/// Result type alias for Website Info operations
pub type Result<T> = std::result::Result<T, Error>;

//! Website Info - MCP server for web page extraction
//!
//! This crate provides an MCP (Model Context Protocol) server that fetches a
//! web page and returns a normalized record of its title, description, body
//! text, links and images, or of caller-chosen CSS selector matches.
//!
//! # Features
//!
//! - **MCP Server**: JSON-RPC over stdio or HTTP
//! - **AgentQL Extraction**: remote extraction when an API key is configured
//! - **Direct Extraction**: plain GET and local HTML parsing otherwise
//!
//! # Architecture
//!
//! ```text
//! AI Agent ──▶ MCP Server ──▶ Dispatcher ──┬──▶ RemoteExtractor (AgentQL)
//!                                          │
//!                                          └──▶ LocalExtractor (GET + scraper)
//!                                                     │
//!                                                     ▼
//!                                             ExtractionResult
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use website_info::config::ExtractorConfig;
//! use website_info::extraction::Dispatcher;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = Dispatcher::new(&ExtractorConfig::default())?;
//!
//!     let page = dispatcher.fetch_website("example.com").await;
//!     println!("{}", serde_json::to_string_pretty(&page)?);
//!
//!     let fields = dispatcher
//!         .extract_content("example.com", Some(r#"{"headlines": "h1, h2"}"#))
//!         .await;
//!     println!("{}", serde_json::to_string_pretty(&fields)?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod cors;
pub mod error;
pub mod extraction;
pub mod http;
pub mod mcp;

// Re-exports for convenience
pub use config::{Config, ExtractorConfig};
pub use error::{Error, Result};
pub use extraction::{Dispatcher, ExtractionResult};
pub use mcp::{McpServer, McpTool};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

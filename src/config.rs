//! Server and extractor configuration
//!
//! [`Config`] is the command-line / environment surface parsed by the binary.
//! [`ExtractorConfig`] is the explicit configuration handed to the
//! [`Dispatcher`](crate::extraction::Dispatcher); nothing in the library reads
//! the process environment on its own.

use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Default AgentQL query endpoint
pub const DEFAULT_API_URL: &str = "https://api.agentql.com/v1/query-data";

/// User-Agent sent on direct page fetches
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 Website Info MCP";

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default read timeout in seconds
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 20;

/// Transport the MCP server listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// JSON-RPC over `POST /mcp`
    Http,
}

/// Website Info MCP Server
#[derive(Parser, Debug, Clone)]
#[command(name = "website-info-mcp")]
#[command(version)]
#[command(about = "MCP server that fetches websites and extracts structured content")]
pub struct Config {
    /// AgentQL query endpoint
    #[arg(long, env = "AGENTQL_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// AgentQL API key; when unset pages are fetched and parsed directly
    #[arg(long, env = "AGENTQL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Port for the HTTP transport
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Host for the HTTP transport
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Transport to serve MCP on
    #[arg(long, env = "MCP_TRANSPORT", value_enum, default_value = "stdio")]
    pub transport: Transport,

    /// Connect timeout for outbound requests
    #[arg(long, env = "CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_secs: u64,

    /// Total request timeout for outbound requests
    #[arg(long, env = "READ_TIMEOUT_SECS", default_value_t = DEFAULT_READ_TIMEOUT_SECS)]
    pub read_timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Build the extractor configuration from the parsed arguments
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone().filter(|k| !k.trim().is_empty()),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Socket address string for the HTTP transport
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration for the extraction strategies
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// AgentQL query endpoint
    pub api_url: String,
    /// AgentQL API key; `None` selects direct fetching
    pub api_key: Option<String>,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub read_timeout: Duration,
    /// User-Agent for direct page fetches
    pub user_agent: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Set the API key. Empty keys are treated as absent.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = if key.trim().is_empty() { None } else { Some(key) };
        self
    }

    /// Set the API endpoint
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set both timeouts
    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    /// Whether the remote extraction API will be used
    pub fn uses_remote(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(!config.uses_remote());
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.read_timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_empty_api_key_is_absent() {
        let config = ExtractorConfig::default().with_api_key("  ");
        assert!(config.api_key.is_none());

        let config = ExtractorConfig::default().with_api_key("secret");
        assert!(config.uses_remote());
    }

    #[test]
    fn test_cli_parsing() {
        let config = Config::try_parse_from([
            "website-info-mcp",
            "--api-key",
            "",
            "--transport",
            "http",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
        ])
        .unwrap();
        assert_eq!(config.transport, Transport::Http);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert!(config.extractor_config().api_key.is_none());
    }
}

//! Strategy selection
//!
//! The [`Dispatcher`] owns one HTTP client and both extractors. When an API
//! key is configured every call goes through AgentQL, otherwise pages are
//! fetched and parsed locally. Operations always return an
//! [`ExtractionResult`]; failures are reported in-band.

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::extraction::local::LocalExtractor;
use crate::extraction::normalize::normalize_url;
use crate::extraction::remote::RemoteExtractor;
use crate::extraction::result::{ExtractionResult, Source};
use crate::extraction::selectors::SelectorMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Message for requests without a URL
pub const MISSING_URL: &str = "URL parameter is required";

/// Inbound request for either operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Target URL, scheme optional
    #[serde(default)]
    pub url: String,
    /// JSON object of `field: selector` pairs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectors_json: Option<String>,
}

/// Routes operations to the remote or local extractor
#[derive(Debug, Clone)]
pub struct Dispatcher {
    local: LocalExtractor,
    remote: Option<RemoteExtractor>,
}

impl Dispatcher {
    /// Build the HTTP client and extractors from configuration
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        let remote = config.api_key.as_ref().map(|key| {
            RemoteExtractor::new(client.clone(), config.api_url.clone(), key.clone())
        });

        let strategy = if remote.is_some() {
            Source::AgentQl
        } else {
            Source::Direct
        };
        info!("Extraction strategy: {}", strategy.as_str());

        Ok(Self {
            local: LocalExtractor::new(client),
            remote,
        })
    }

    /// Whether calls go through the extraction API
    pub fn uses_remote(&self) -> bool {
        self.remote.is_some()
    }

    fn source(&self) -> Source {
        if self.uses_remote() {
            Source::AgentQl
        } else {
            Source::Direct
        }
    }

    /// Fetch a page and summarize it
    #[instrument(skip(self))]
    pub async fn fetch_website(&self, url: &str) -> ExtractionResult {
        if url.trim().is_empty() {
            return ExtractionResult::error("", self.source(), MISSING_URL);
        }
        let url = normalize_url(url);

        match &self.remote {
            Some(remote) => remote.fetch_page(&url).await,
            None => self.local.fetch_page(&url).await,
        }
    }

    /// Extract fields from a page using a selector mapping
    #[instrument(skip(self))]
    pub async fn extract_content(
        &self,
        url: &str,
        selectors_json: Option<&str>,
    ) -> ExtractionResult {
        if url.trim().is_empty() {
            return ExtractionResult::error("", self.source(), MISSING_URL);
        }
        let url = normalize_url(url);
        let selectors = SelectorMap::resolve(selectors_json);
        info!(
            source = ?selectors.source(),
            "Resolved {} selector fields",
            selectors.fields().len()
        );

        match &self.remote {
            Some(remote) => remote.extract(&url, &selectors).await,
            None => self.local.extract(&url, &selectors).await,
        }
    }

    /// Route a request: selectors present means `extract_content`
    pub async fn dispatch(&self, request: &ExtractionRequest) -> ExtractionResult {
        match request.selectors_json.as_deref() {
            Some(selectors) => self.extract_content(&request.url, Some(selectors)).await,
            None => self.fetch_website(&request.url).await,
        }
    }
}

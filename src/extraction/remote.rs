//! AgentQL-backed extraction
//!
//! Posts `{url, query}` to the configured query-data endpoint and maps the
//! returned `data` object into an [`ExtractionResult`].

use crate::error::{Error, ExtractionError, Result};
use crate::extraction::result::{
    normalize_images, normalize_links, ExtractionResult, FieldValue, Image, Link, PageSummary,
    Source, NO_DESCRIPTION, NO_TITLE,
};
use crate::extraction::selectors::SelectorMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Fields requested by a whole-page fetch
pub const PAGE_FIELDS: &[&str] = &["title", "paragraphs", "images", "links"];

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    url: &'a str,
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    error_info: Option<Value>,
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

/// Build an AgentQL query from field names: `{ a b c }`
pub fn build_query<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let fields: Vec<&str> = fields.into_iter().collect();
    format!("{{ {} }}", fields.join(" "))
}

/// Client for the AgentQL query-data API
#[derive(Debug, Clone)]
pub struct RemoteExtractor {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RemoteExtractor {
    /// Create an extractor using a shared HTTP client
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Run a query and return the `data` object
    #[instrument(skip(self))]
    pub async fn query(&self, url: &str, query: &str) -> Result<Map<String, Value>> {
        debug!("POST {} query={}", self.endpoint, query);

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&QueryRequest { url, query })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("AgentQL returned {}", status);
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: QueryResponse = response.json().await?;

        match parsed.error_info {
            None | Some(Value::Null) | Some(Value::Bool(false)) => {}
            Some(Value::String(info)) => return Err(Error::Remote(info)),
            Some(other) => return Err(Error::Remote(other.to_string())),
        }

        parsed.data.ok_or_else(|| ExtractionError::MissingData.into())
    }

    /// Whole-page extraction through AgentQL
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, url: &str) -> ExtractionResult {
        info!("Fetching page via AgentQL");

        match self.query(url, &build_query(PAGE_FIELDS.iter().copied())).await {
            Ok(data) => summarize_data(&data).into_result(url, Source::AgentQl),
            Err(e) => ExtractionResult::error(
                url,
                Source::AgentQl,
                error_message(&e, "Error fetching website"),
            ),
        }
    }

    /// Selector-driven extraction through AgentQL; only field names are sent
    #[instrument(skip(self, selectors))]
    pub async fn extract(&self, url: &str, selectors: &SelectorMap) -> ExtractionResult {
        let query = build_query(selectors.names());
        info!("Extracting via AgentQL: {}", query);

        match self.query(url, &query).await {
            Ok(data) => {
                let mut result = ExtractionResult::success(url, Source::AgentQl);
                for (name, value) in data {
                    result.push_field(name, FieldValue::Json(value));
                }
                result
            }
            Err(e) => ExtractionResult::error(
                url,
                Source::AgentQl,
                error_message(&e, "Error extracting content"),
            ),
        }
    }
}

/// Map a query failure to the client-facing message
pub fn error_message(err: &Error, context: &str) -> String {
    match err {
        Error::Remote(info) => format!("AgentQL error: {}", info),
        Error::Status { status, body } => format!("AgentQL API error: {} - {}", status, body),
        other => format!("{}: {}", context, other),
    }
}

/// Normalize a whole-page `data` object
pub fn summarize_data(data: &Map<String, Value>) -> PageSummary {
    let title = data
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(NO_TITLE)
        .to_string();

    let description = data
        .get("meta_description")
        .and_then(Value::as_str)
        .unwrap_or(NO_DESCRIPTION)
        .to_string();

    let content = match data.get("paragraphs") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };

    let links = array(data, "links").map(|item| match item {
        Value::String(href) => Link {
            text: String::new(),
            href: href.clone(),
        },
        other => Link {
            text: str_field(other, "text").unwrap_or_default(),
            href: str_field(other, "href").unwrap_or_default(),
        },
    });

    let images = array(data, "images").map(|item| match item {
        Value::String(src) => Image {
            alt: None,
            src: src.clone(),
        },
        other => Image {
            alt: str_field(other, "alt"),
            src: str_field(other, "src").unwrap_or_default(),
        },
    });

    PageSummary {
        title,
        description,
        content,
        links: normalize_links(links),
        images: normalize_images(images),
    }
}

fn array<'a>(data: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Value> {
    data.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_build_query() {
        assert_eq!(
            build_query(PAGE_FIELDS.iter().copied()),
            "{ title paragraphs images links }"
        );
        assert_eq!(build_query(["headlines"]), "{ headlines }");
    }

    #[test]
    fn test_error_messages() {
        let err = Error::Remote("invalid url".into());
        assert_eq!(error_message(&err, "ctx"), "AgentQL error: invalid url");

        let err = Error::Status {
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(
            error_message(&err, "ctx"),
            "AgentQL API error: 401 - unauthorized"
        );

        let err = Error::Extraction(ExtractionError::MissingData);
        assert_eq!(
            error_message(&err, "Error fetching website"),
            "Error fetching website: Extraction error: Response missing data object"
        );
    }

    #[test]
    fn test_summarize_data() {
        let summary = summarize_data(&data(json!({
            "title": "Example",
            "paragraphs": ["One.", "Two."],
            "links": [
                { "text": "A", "href": "https://e.com/a" },
                { "text": "A again", "href": "https://e.com/a" },
                { "text": "empty", "href": "" },
                { "text": "missing" }
            ],
            "images": [
                { "alt": "logo", "src": "https://e.com/logo.png" },
                { "alt": "nothing" }
            ]
        })));

        assert_eq!(summary.title, "Example");
        assert_eq!(summary.description, NO_DESCRIPTION);
        assert_eq!(summary.content, "One. Two.");
        assert_eq!(
            summary.links,
            vec![Link {
                text: "A".into(),
                href: "https://e.com/a".into()
            }]
        );
        assert_eq!(summary.images.len(), 1);
        assert_eq!(summary.images[0].alt.as_deref(), Some("logo"));
    }

    #[test]
    fn test_summarize_empty_data() {
        let summary = summarize_data(&Map::new());
        assert_eq!(summary.title, NO_TITLE);
        assert!(summary.content.is_empty());
        assert!(summary.links.is_empty());
        assert!(summary.images.is_empty());
    }
}

//! Normalized extraction results
//!
//! Both extraction strategies produce an [`ExtractionResult`]. It serializes
//! flat: `status`, `url` and `source` first, then each field as a top-level
//! key in insertion order, then `message` for errors.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// Upper bound on links in a whole-page result
pub const MAX_LINKS: usize = 50;

/// Upper bound on images in a whole-page result
pub const MAX_IMAGES: usize = 20;

/// Placeholder title when a page has none
pub const NO_TITLE: &str = "No title found";

/// Placeholder description when a page has none
pub const NO_DESCRIPTION: &str = "No description found";

const RESERVED_KEYS: &[&str] = &["status", "url", "source", "message"];

/// Outcome of an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Content was extracted
    Success,
    /// Extraction failed; see `message`
    Error,
}

/// Strategy that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// AgentQL extraction API
    #[serde(rename = "agentql")]
    AgentQl,
    /// Direct HTTP fetch and local HTML parse
    Direct,
}

impl Source {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::AgentQl => "agentql",
            Source::Direct => "direct",
        }
    }
}

/// A normalized page link with an absolute href
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Anchor text, trimmed
    pub text: String,
    /// Absolute URL
    pub href: String,
}

/// A normalized page image with an absolute src
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Alt text, if the element had one
    pub alt: Option<String>,
    /// Absolute URL
    pub src: String,
}

/// A link matched by a caller-supplied selector; `href` is the raw attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedLink {
    /// Anchor text, trimmed
    pub text: String,
    /// Raw `href` attribute
    pub href: Option<String>,
}

/// An image matched by a caller-supplied selector; attributes are raw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedImage {
    /// Raw `alt` attribute
    pub alt: Option<String>,
    /// Raw `src` attribute
    pub src: Option<String>,
}

/// Value stored under a result field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single string (title, description, content)
    Text(String),
    /// Texts of matched elements
    List(Vec<String>),
    /// Normalized page links
    Links(Vec<Link>),
    /// Normalized page images
    Images(Vec<Image>),
    /// Links matched by selector
    SelectedLinks(Vec<SelectedLink>),
    /// Images matched by selector
    SelectedImages(Vec<SelectedImage>),
    /// Passed through unchanged from the extraction API
    Json(Value),
}

impl FieldValue {
    /// Borrow as a single string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Json(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Borrow as a list of strings
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as normalized links
    pub fn as_links(&self) -> Option<&[Link]> {
        match self {
            FieldValue::Links(links) => Some(links),
            _ => None,
        }
    }

    /// Borrow as normalized images
    pub fn as_images(&self) -> Option<&[Image]> {
        match self {
            FieldValue::Images(images) => Some(images),
            _ => None,
        }
    }
}

/// Normalized result of `fetch_website` / `extract_content`
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// Outcome
    pub status: Status,
    /// Normalized request URL
    pub url: String,
    /// Strategy used
    pub source: Source,
    /// Extracted fields, in output order
    pub fields: Vec<(String, FieldValue)>,
    /// Error description, only for [`Status::Error`]
    pub message: Option<String>,
}

impl ExtractionResult {
    /// An empty success result
    pub fn success(url: impl Into<String>, source: Source) -> Self {
        Self {
            status: Status::Success,
            url: url.into(),
            source,
            fields: Vec::new(),
            message: None,
        }
    }

    /// An error result
    pub fn error(url: impl Into<String>, source: Source, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            url: url.into(),
            source,
            fields: Vec::new(),
            message: Some(message.into()),
        }
    }

    /// Append a field. Names that collide with the envelope keys are dropped.
    pub fn push_field(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if RESERVED_KEYS.contains(&name.as_str()) {
            warn!(field = %name, "Dropping field that collides with a result key");
            return;
        }
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder-style [`push_field`](Self::push_field)
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.push_field(name, value);
        self
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Field names in output order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Whether extraction succeeded
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Serialize to a JSON value
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "status": "error", "url": self.url, "message": e.to_string() })
        })
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 3 + self.fields.len() + usize::from(self.message.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("status", &self.status)?;
        map.serialize_entry("url", &self.url)?;
        map.serialize_entry("source", &self.source)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        if let Some(message) = &self.message {
            map.serialize_entry("message", message)?;
        }
        map.end()
    }
}

/// Whole-page summary shared by both strategies
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    /// Page title
    pub title: String,
    /// Meta description
    pub description: String,
    /// Body text
    pub content: String,
    /// Unique links, at most [`MAX_LINKS`]
    pub links: Vec<Link>,
    /// Images, at most [`MAX_IMAGES`]
    pub images: Vec<Image>,
}

impl PageSummary {
    /// Convert into a success result
    pub fn into_result(self, url: impl Into<String>, source: Source) -> ExtractionResult {
        ExtractionResult::success(url, source)
            .with_field("title", FieldValue::Text(self.title))
            .with_field("description", FieldValue::Text(self.description))
            .with_field("content", FieldValue::Text(self.content))
            .with_field("links", FieldValue::Links(self.links))
            .with_field("images", FieldValue::Images(self.images))
    }
}

/// Drop empty hrefs, deduplicate by href (first wins) and cap at [`MAX_LINKS`]
pub fn normalize_links(links: impl IntoIterator<Item = Link>) -> Vec<Link> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| !link.href.is_empty())
        .filter(|link| seen.insert(link.href.clone()))
        .take(MAX_LINKS)
        .collect()
}

/// Drop empty srcs and cap at [`MAX_IMAGES`]
pub fn normalize_images(images: impl IntoIterator<Item = Image>) -> Vec<Image> {
    images
        .into_iter()
        .filter(|image| !image.src.is_empty())
        .take(MAX_IMAGES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn link(href: &str) -> Link {
        Link {
            text: href.to_string(),
            href: href.to_string(),
        }
    }

    #[test]
    fn test_serializes_flat_in_order() {
        let result = ExtractionResult::success("https://example.com", Source::Direct)
            .with_field("title", FieldValue::List(vec!["Example".into()]))
            .with_field("paragraphs", FieldValue::List(vec![]));

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"status":"success","url":"https://example.com","source":"direct","title":["Example"],"paragraphs":[]}"#
        );
    }

    #[test]
    fn test_source_name_matches_wire_name() {
        for source in [Source::AgentQl, Source::Direct] {
            assert_eq!(serde_json::to_value(source).unwrap(), source.as_str());
        }
    }

    #[test]
    fn test_error_has_message() {
        let result =
            ExtractionResult::error("https://x.test", Source::AgentQl, "AgentQL error: boom");
        let value = result.to_value();
        assert_eq!(value["status"], "error");
        assert_eq!(value["source"], "agentql");
        assert_eq!(value["message"], "AgentQL error: boom");
        assert!(!result.is_success());
    }

    #[test]
    fn test_reserved_field_names_dropped() {
        let mut result = ExtractionResult::success("https://example.com", Source::AgentQl);
        result.push_field("url", FieldValue::Text("https://elsewhere".into()));
        result.push_field("status", FieldValue::Text("bogus".into()));
        assert!(result.fields.is_empty());
        assert_eq!(result.to_value()["url"], "https://example.com");
    }

    #[test]
    fn test_push_field_replaces_existing() {
        let mut result = ExtractionResult::success("https://example.com", Source::Direct);
        result.push_field("title", FieldValue::Text("a".into()));
        result.push_field("title", FieldValue::Text("b".into()));
        assert_eq!(result.fields.len(), 1);
        assert_eq!(result.field("title").and_then(FieldValue::as_text), Some("b"));
    }

    #[test]
    fn test_selected_link_serializes_null_href() {
        let value = FieldValue::SelectedLinks(vec![SelectedLink {
            text: "Home".into(),
            href: None,
        }]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!([{ "text": "Home", "href": null }])
        );
    }

    #[test]
    fn test_normalize_links_dedupes_and_caps() {
        let mut links: Vec<Link> = (0..80).map(|i| link(&format!("https://e.com/{i}"))).collect();
        links.insert(1, link("https://e.com/0"));
        links.insert(2, link(""));

        let normalized = normalize_links(links);
        assert_eq!(normalized.len(), MAX_LINKS);
        assert_eq!(normalized[0].href, "https://e.com/0");
        assert_eq!(normalized[1].href, "https://e.com/1");
    }

    #[test]
    fn test_normalize_images_caps() {
        let images = (0..30).map(|i| Image {
            alt: None,
            src: if i == 0 { String::new() } else { format!("https://e.com/{i}.png") },
        });
        let normalized = normalize_images(images);
        assert_eq!(normalized.len(), MAX_IMAGES);
        assert_eq!(normalized[0].src, "https://e.com/1.png");
    }
}

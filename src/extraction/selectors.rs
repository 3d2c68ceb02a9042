//! Selector resolution
//!
//! Turns the user-supplied `selectors_json` argument into an ordered list of
//! field → CSS selector entries. Resolution never fails: anything unusable
//! falls back to [`DEFAULT_SELECTORS`], and the fallback is recorded in
//! [`SelectorSource`] so callers can tell it apart from an explicit mapping.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Default field mapping used when no usable selectors are supplied
pub const DEFAULT_SELECTORS: &[(&str, &str)] = &[
    ("title", "title"),
    ("headings", "h1, h2, h3"),
    ("paragraphs", "p"),
    ("links", "a"),
];

/// How values for a field are shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Trimmed text of each match
    Text,
    /// `{text, href}` per match
    Link,
    /// `{alt, src}` per match
    Image,
}

impl FieldKind {
    /// Infer the kind from a field name
    pub fn for_field(name: &str) -> Self {
        match name {
            "a" | "link" | "links" => FieldKind::Link,
            "img" | "image" | "images" => FieldKind::Image,
            _ => FieldKind::Text,
        }
    }
}

/// One field → selector entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSelector {
    /// Result key
    pub name: String,
    /// CSS selector
    pub selector: String,
    /// Value shape
    pub kind: FieldKind,
}

impl FieldSelector {
    /// Create an entry, inferring its kind from the name
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        let name = name.into();
        let kind = FieldKind::for_field(&name);
        Self {
            name,
            selector: selector.into(),
            kind,
        }
    }
}

/// Why the default mapping was used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultReason {
    /// No selectors argument was given
    Absent,
    /// The argument was not valid JSON
    Malformed,
    /// Valid JSON, but not an object
    NotAnObject,
    /// An object without any string-valued entries
    Empty,
}

/// Where a resolved mapping came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorSource {
    /// Taken from the caller's JSON
    Provided,
    /// Fell back to [`DEFAULT_SELECTORS`]
    Defaulted(DefaultReason),
}

/// Ordered field → selector mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorMap {
    fields: Vec<FieldSelector>,
    source: SelectorSource,
}

impl SelectorMap {
    /// The default mapping, tagged with the reason it was chosen
    pub fn defaults(reason: DefaultReason) -> Self {
        Self {
            fields: DEFAULT_SELECTORS
                .iter()
                .map(|(name, selector)| FieldSelector::new(*name, *selector))
                .collect(),
            source: SelectorSource::Defaulted(reason),
        }
    }

    /// Resolve an optional JSON object of `field: selector` pairs
    pub fn resolve(selectors_json: Option<&str>) -> Self {
        let raw = match selectors_json.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Self::defaults(DefaultReason::Absent),
        };

        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                debug!("Selector JSON did not parse, using defaults: {}", e);
                return Self::defaults(DefaultReason::Malformed);
            }
        };

        let Value::Object(map) = value else {
            debug!("Selector JSON is not an object, using defaults");
            return Self::defaults(DefaultReason::NotAnObject);
        };

        let fields: Vec<FieldSelector> = map
            .into_iter()
            .filter_map(|(name, selector)| match selector {
                Value::String(s) => Some(FieldSelector::new(name, s)),
                other => {
                    warn!(field = %name, "Skipping non-string selector: {}", other);
                    None
                }
            })
            .collect();

        if fields.is_empty() {
            return Self::defaults(DefaultReason::Empty);
        }

        Self {
            fields,
            source: SelectorSource::Provided,
        }
    }

    /// Entries in mapping order
    pub fn fields(&self) -> &[FieldSelector] {
        &self.fields
    }

    /// Field names in mapping order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Where this mapping came from
    pub fn source(&self) -> SelectorSource {
        self.source
    }

    /// Whether the default mapping was substituted
    pub fn is_defaulted(&self) -> bool {
        matches!(self.source, SelectorSource::Defaulted(_))
    }
}

impl Default for SelectorMap {
    fn default() -> Self {
        Self::defaults(DefaultReason::Absent)
    }
}

//! Content extraction module
//!
//! This module turns a URL (and optionally a selector mapping) into a
//! normalized [`ExtractionResult`], either through the AgentQL API or by
//! fetching and parsing the page directly.

pub mod dispatcher;
pub mod local;
pub mod normalize;
pub mod remote;
pub mod result;
pub mod selectors;

pub use dispatcher::{Dispatcher, ExtractionRequest, MISSING_URL};
pub use local::{apply_selectors, summarize_html, LocalExtractor};
pub use normalize::normalize_url;
pub use remote::{build_query, RemoteExtractor};
pub use result::{
    ExtractionResult, FieldValue, Image, Link, PageSummary, SelectedImage, SelectedLink, Source,
    Status, MAX_IMAGES, MAX_LINKS,
};
pub use selectors::{
    DefaultReason, FieldKind, FieldSelector, SelectorMap, SelectorSource, DEFAULT_SELECTORS,
};

//! Direct fetch and local HTML extraction
//!
//! Downloads the page with a plain GET and parses it with `scraper`. Two
//! mapping rules live here and are deliberately kept apart:
//!
//! - [`summarize_html`]: fixed, region-aware rules for a whole-page summary
//!   (links and images resolved to absolute URLs, capped and deduplicated).
//! - [`apply_selectors`]: one caller-supplied CSS selector per field, values
//!   shaped by [`FieldKind`] with raw, unresolved attributes.

use crate::error::{Error, ExtractionError, Result};
use crate::extraction::result::{
    normalize_images, normalize_links, ExtractionResult, FieldValue, Image, Link, PageSummary,
    SelectedImage, SelectedLink, Source, NO_DESCRIPTION, NO_TITLE,
};
use crate::extraction::selectors::{FieldKind, SelectorMap};
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Elements treated as main-content regions
pub const MAIN_CONTENT_SELECTOR: &str =
    "article, main, .content, .main-content, #content, #main-content";

/// Elements whose text makes up the page body
pub const TEXT_BLOCK_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A downloaded page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; base for relative links
    pub url: Url,
    /// Response body
    pub html: String,
}

/// Direct-fetch extractor
#[derive(Debug, Clone)]
pub struct LocalExtractor {
    client: Client,
}

impl LocalExtractor {
    /// Create an extractor using a shared HTTP client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// GET the page body. Non-success statuses become [`Error::Status`].
    #[instrument(skip(self))]
    pub async fn fetch_html(&self, url: &str) -> Result<FetchedPage> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Direct fetch returned {}", status);
            return Err(Error::Status {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let url = response.url().clone();
        let html = response.text().await?;
        debug!("Fetched {} bytes from {}", html.len(), url);

        Ok(FetchedPage { url, html })
    }

    /// Whole-page extraction without the API
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, url: &str) -> ExtractionResult {
        info!("Fetching page directly");

        let summary = match self.fetch_html(url).await {
            Ok(page) => summarize_html(&page.html, &page.url),
            Err(e) => Err(e),
        };

        match summary {
            Ok(summary) => summary.into_result(url, Source::Direct),
            Err(e) => error_result(url, &e, "Error fetching website"),
        }
    }

    /// Selector-driven extraction without the API
    #[instrument(skip(self, selectors))]
    pub async fn extract(&self, url: &str, selectors: &SelectorMap) -> ExtractionResult {
        info!("Extracting {} fields directly", selectors.fields().len());

        let fields = match self.fetch_html(url).await {
            Ok(page) => apply_selectors(&page.html, selectors),
            Err(e) => Err(e),
        };

        match fields {
            Ok(fields) => {
                let mut result = ExtractionResult::success(url, Source::Direct);
                for (name, value) in fields {
                    result.push_field(name, value);
                }
                result
            }
            Err(e) => error_result(url, &e, "Error extracting content"),
        }
    }
}

fn error_result(url: &str, err: &Error, context: &str) -> ExtractionResult {
    let message = match err {
        Error::Status { status, .. } => {
            format!("Failed to fetch website. Status code: {}", status)
        }
        other => format!("{}: {}", context, other),
    };
    ExtractionResult::error(url, Source::Direct, message)
}

/// Compile a CSS selector
pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| {
        ExtractionError::InvalidSelector {
            selector: css.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Collapse whitespace runs to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect()
}

/// Build the fixed whole-page summary from an HTML document
pub fn summarize_html(html: &str, base: &Url) -> Result<PageSummary> {
    let document = Html::parse_document(html);

    let title = document
        .select(&parse_selector("title")?)
        .next()
        .map(|el| element_text(&el).trim().to_string())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let description = document
        .select(&parse_selector(r#"meta[name="description"]"#)?)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(String::from)
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let content = collapse_whitespace(&body_text(&document)?);

    let anchors = parse_selector("a")?;
    let links = document.select(&anchors).filter_map(|el| {
        let href = el.value().attr("href")?;
        if href.is_empty() || href.starts_with('#') {
            return None;
        }
        let href = resolve(base, href)?;
        Some(Link {
            text: element_text(&el).trim().to_string(),
            href,
        })
    });
    let links = normalize_links(links);

    let img = parse_selector("img")?;
    let images = document.select(&img).filter_map(|el| {
        let src = el.value().attr("src")?;
        if src.is_empty() {
            return None;
        }
        Some(Image {
            alt: el.value().attr("alt").map(String::from),
            src: resolve(base, src)?,
        })
    });
    let images = normalize_images(images);

    debug!(
        "Summarized page: {} chars, {} links, {} images",
        content.len(),
        links.len(),
        images.len()
    );

    Ok(PageSummary {
        title,
        description,
        content,
        links,
        images,
    })
}

/// Text of paragraph and heading elements, scoped to main-content regions when
/// the document has any
fn body_text(document: &Html) -> Result<String> {
    let blocks = parse_selector(TEXT_BLOCK_SELECTOR)?;
    let regions: Vec<ElementRef<'_>> = document
        .select(&parse_selector(MAIN_CONTENT_SELECTOR)?)
        .collect();

    let texts: Vec<String> = if regions.is_empty() {
        document.select(&blocks).map(|el| element_text(&el)).collect()
    } else {
        // nested regions would otherwise repeat their blocks
        let mut seen = HashSet::new();
        regions
            .iter()
            .flat_map(|region| region.select(&blocks))
            .filter(|el| seen.insert(el.id()))
            .map(|el| element_text(&el))
            .collect()
    };

    Ok(texts.join(" "))
}

fn resolve(base: &Url, reference: &str) -> Option<String> {
    match base.join(reference) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!("Skipping unresolvable reference {:?}: {}", reference, e);
            None
        }
    }
}

/// Apply a selector mapping to an HTML document, in mapping order
pub fn apply_selectors(html: &str, selectors: &SelectorMap) -> Result<Vec<(String, FieldValue)>> {
    let document = Html::parse_document(html);

    selectors
        .fields()
        .iter()
        .map(|field| {
            let selector = parse_selector(&field.selector)?;
            let matches = document.select(&selector);

            let value = match field.kind {
                FieldKind::Link => FieldValue::SelectedLinks(
                    matches
                        .map(|el| SelectedLink {
                            text: element_text(&el).trim().to_string(),
                            href: el.value().attr("href").map(String::from),
                        })
                        .collect(),
                ),
                FieldKind::Image => FieldValue::SelectedImages(
                    matches
                        .map(|el| SelectedImage {
                            alt: el.value().attr("alt").map(String::from),
                            src: el.value().attr("src").map(String::from),
                        })
                        .collect(),
                ),
                FieldKind::Text => FieldValue::List(
                    matches
                        .map(|el| element_text(&el).trim().to_string())
                        .collect(),
                ),
            };

            Ok((field.name.clone(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::result::{MAX_IMAGES, MAX_LINKS};
    use pretty_assertions::assert_eq;

    const PAGE: &str = r##"
        <html>
          <head>
            <title> Example Domain </title>
            <meta name="description" content="An example page">
          </head>
          <body>
            <nav><p>Navigation text</p><a href="#top">Top</a></nav>
            <main>
              <h1>Welcome</h1>
              <p>First   paragraph
                 spans lines.</p>
              <article><p>Nested article.</p></article>
            </main>
            <a href="/about"> About us </a>
            <a href="https://other.test/x">Other</a>
            <a href="/about">About again</a>
            <a href="">Empty</a>
            <a>No href</a>
            <img src="/logo.png" alt="Logo">
            <img src="">
            <img src="https://cdn.test/pic.jpg">
          </body>
        </html>
    "##;

    fn base() -> Url {
        Url::parse("https://example.com/docs/index.html").unwrap()
    }

    #[test]
    fn test_summarize_title_and_description() {
        let summary = summarize_html(PAGE, &base()).unwrap();
        assert_eq!(summary.title, "Example Domain");
        assert_eq!(summary.description, "An example page");
    }

    #[test]
    fn test_summarize_scopes_content_to_main_regions() {
        let summary = summarize_html(PAGE, &base()).unwrap();
        assert_eq!(
            summary.content,
            "Welcome First paragraph spans lines. Nested article."
        );
        assert!(!summary.content.contains("Navigation"));
    }

    #[test]
    fn test_summarize_without_regions_uses_whole_document() {
        let html = "<html><body><h2>Head</h2><div><p>Body</p></div></body></html>";
        let summary = summarize_html(html, &base()).unwrap();
        assert_eq!(summary.content, "Head Body");
        assert_eq!(summary.title, NO_TITLE);
        assert_eq!(summary.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_summarize_links_resolved_and_deduplicated() {
        let summary = summarize_html(PAGE, &base()).unwrap();
        let hrefs: Vec<&str> = summary.links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec!["https://example.com/about", "https://other.test/x"]
        );
        assert_eq!(summary.links[0].text, "About us");
    }

    #[test]
    fn test_summarize_images_resolved() {
        let summary = summarize_html(PAGE, &base()).unwrap();
        assert_eq!(
            summary.images,
            vec![
                Image {
                    alt: Some("Logo".into()),
                    src: "https://example.com/logo.png".into()
                },
                Image {
                    alt: None,
                    src: "https://cdn.test/pic.jpg".into()
                },
            ]
        );
    }

    #[test]
    fn test_summarize_caps_links_and_images() {
        let mut html = String::from("<html><body>");
        for i in 0..120 {
            html.push_str(&format!(r#"<a href="/p/{i}">{i}</a><img src="/i/{i}.png">"#));
        }
        html.push_str("</body></html>");

        let summary = summarize_html(&html, &base()).unwrap();
        assert_eq!(summary.links.len(), MAX_LINKS);
        assert_eq!(summary.images.len(), MAX_IMAGES);
    }

    #[test]
    fn test_apply_selectors_shapes_values() {
        let selectors = SelectorMap::resolve(Some(
            r#"{"title": "title", "links": "a", "images": "img", "paragraphs": "main p"}"#,
        ));
        let fields = apply_selectors(PAGE, &selectors).unwrap();

        let names: Vec<&str> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["title", "links", "images", "paragraphs"]);

        assert_eq!(fields[0].1, FieldValue::List(vec!["Example Domain".into()]));

        let FieldValue::SelectedLinks(links) = &fields[1].1 else {
            panic!("expected links");
        };
        assert_eq!(links.len(), 6);
        assert_eq!(links[0].href.as_deref(), Some("#top"));
        assert_eq!(links[1].href.as_deref(), Some("/about"));
        assert_eq!(links[5].href, None);

        let FieldValue::SelectedImages(images) = &fields[2].1 else {
            panic!("expected images");
        };
        assert_eq!(images.len(), 3);
        assert_eq!(images[0].src.as_deref(), Some("/logo.png"));

        let paragraphs = fields[3].1.as_list().unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].starts_with("First   paragraph"));
        assert!(paragraphs[0].ends_with("spans lines."));
        assert_eq!(paragraphs[1], "Nested article.");
    }

    #[test]
    fn test_apply_selectors_invalid_selector() {
        let selectors = SelectorMap::resolve(Some(r#"{"broken": "p[["}"#));
        let err = apply_selectors(PAGE, &selectors).unwrap_err();
        assert!(err.to_string().contains("Invalid selector 'p[['"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace(""), "");
    }
}

//! # Website Info - Extract Content Example
//!
//! Extracts fields from a page with a CSS selector mapping.
//!
//! Run with:
//! `cargo run --example extract_content -- example.com '{"headings": "h1, h2", "links": "a"}'`
//!
//! Without a mapping the default `title`/`headings`/`paragraphs`/`links`
//! fields are used.

use website_info::config::ExtractorConfig;
use website_info::extraction::{Dispatcher, ExtractionRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let mut args = std::env::args().skip(1);
    let request = ExtractionRequest {
        url: args.next().unwrap_or_else(|| "example.com".to_string()),
        selectors_json: Some(args.next().unwrap_or_default()),
    };

    let mut config = ExtractorConfig::default();
    if let Ok(key) = std::env::var("AGENTQL_API_KEY") {
        config = config.with_api_key(key);
    }
    let dispatcher = Dispatcher::new(&config)?;

    let result = dispatcher.dispatch(&request).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

//! # Website Info - Fetch Website Example
//!
//! Summarizes one page: title, description, body text, links and images.
//!
//! Run with: `cargo run --example fetch_website -- example.com`
//!
//! Set `AGENTQL_API_KEY` to go through AgentQL instead of fetching directly.

use website_info::config::ExtractorConfig;
use website_info::extraction::{Dispatcher, FieldValue};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "example.com".to_string());

    let mut config = ExtractorConfig::default();
    if let Ok(key) = std::env::var("AGENTQL_API_KEY") {
        config = config.with_api_key(key);
    }
    let dispatcher = Dispatcher::new(&config)?;

    println!("Fetching {} ({})", url, if dispatcher.uses_remote() { "agentql" } else { "direct" });
    println!();

    let result = dispatcher.fetch_website(&url).await;
    if !result.is_success() {
        eprintln!("Error: {}", result.message.as_deref().unwrap_or("unknown"));
        std::process::exit(1);
    }

    if let Some(title) = result.field("title").and_then(FieldValue::as_text) {
        println!("Title:       {}", title);
    }
    if let Some(description) = result.field("description").and_then(FieldValue::as_text) {
        println!("Description: {}", description);
    }
    if let Some(content) = result.field("content").and_then(FieldValue::as_text) {
        let preview: String = content.chars().take(200).collect();
        println!("Content:     {}...", preview);
    }

    if let Some(links) = result.field("links").and_then(FieldValue::as_links) {
        println!();
        println!("Links ({}):", links.len());
        for link in links.iter().take(10) {
            println!("   - {} -> {}", link.text, link.href);
        }
    }
    if let Some(images) = result.field("images").and_then(FieldValue::as_images) {
        println!();
        println!("Images ({}):", images.len());
        for image in images.iter().take(5) {
            println!("   - {} ({})", image.src, image.alt.as_deref().unwrap_or(""));
        }
    }

    Ok(())
}

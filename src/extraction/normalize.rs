//! URL normalization

/// Ensure a URL carries an `http://` or `https://` scheme.
///
/// Anything without one gets `https://` prepended. No further validation
/// happens here; malformed URLs fail in the HTTP client.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

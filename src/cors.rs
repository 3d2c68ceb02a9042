//! CORS configuration for the HTTP transport
//!
//! Only loopback origins (`localhost`, `127.0.0.1`, `[::1]`, any port) may
//! call the MCP endpoint from a browser.
//!
//! # Example
//!
//! ```rust,ignore
//! use website_info::cors::cors_layer;
//! use axum::Router;
//!
//! let app = Router::new()
//!     .route("/mcp", post(mcp_handler))
//!     .layer(cors_layer());
//! ```

use http::{header::HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use url::{Host, Url};

/// Allowed headers for the MCP HTTP transport
pub const ALLOWED_HEADERS: [http::header::HeaderName; 1] = [http::header::CONTENT_TYPE];

/// Allowed methods for the MCP HTTP transport
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Max age for preflight cache (1 hour)
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

/// CORS layer admitting loopback origins only
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin, _| {
            is_localhost_origin(origin)
        }))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
        .max_age(Duration::from_secs(DEFAULT_MAX_AGE_SECS))
}

/// Whether an `Origin` header names a loopback host over http(s)
///
/// ```rust
/// use http::header::HeaderValue;
/// use website_info::cors::is_localhost_origin;
///
/// assert!(is_localhost_origin(&HeaderValue::from_static("http://localhost:3000")));
/// assert!(!is_localhost_origin(&HeaderValue::from_static("http://example.com")));
/// ```
pub fn is_localhost_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    let Ok(url) = Url::parse(origin) else {
        return false;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(s: &'static str) -> HeaderValue {
        HeaderValue::from_static(s)
    }

    #[test]
    fn test_localhost_origins_allowed() {
        assert!(is_localhost_origin(&origin("http://localhost")));
        assert!(is_localhost_origin(&origin("http://localhost:3000")));
        assert!(is_localhost_origin(&origin("https://127.0.0.1:8443")));
        assert!(is_localhost_origin(&origin("http://[::1]:3000")));
    }

    #[test]
    fn test_external_origins_rejected() {
        assert!(!is_localhost_origin(&origin("http://example.com")));
        assert!(!is_localhost_origin(&origin("http://localhost.evil.com")));
        assert!(!is_localhost_origin(&origin("http://192.168.1.10")));
        assert!(!is_localhost_origin(&origin("file://localhost")));
        assert!(!is_localhost_origin(&origin("null")));
    }
}

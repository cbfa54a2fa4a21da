//! Inbound request view.
//!
//! # Responsibilities
//! - Capture method, path and headers of one request
//! - Expose the few headers the core handler acts on (Range, Origin,
//!   Accept-Encoding)
//! - Name the request-id header shared with the tower-http layers
//!
//! # Design Decisions
//! - The query string is dropped; the gateway takes no parameters
//! - Header lookups are case-insensitive through `HeaderMap`

use axum::http::{header, HeaderMap, HeaderName, Method, Request};

use crate::http::compression::accepts_gzip;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// The parts of a request the core handler needs. Immutable once built.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub origin_present: bool,
}

impl InboundRequest {
    pub fn new(method: Method, path: impl Into<String>, headers: HeaderMap) -> Self {
        let origin_present = headers.contains_key(header::ORIGIN);
        Self {
            method,
            path: path.into(),
            headers,
            origin_present,
        }
    }

    /// Build from an axum request, keeping only the URI path.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::new(
            request.method().clone(),
            request.uri().path(),
            request.headers().clone(),
        )
    }

    /// The `Range` header, if present and non-empty.
    ///
    /// A value that is not visible ASCII is returned lossily so it still
    /// fails range parsing instead of being ignored.
    pub fn range(&self) -> Option<String> {
        let value = self.headers.get(header::RANGE)?;
        let text = match value.to_str() {
            Ok(text) => text.to_string(),
            Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn accepts_gzip(&self) -> bool {
        accepts_gzip(&self.headers)
    }

    pub fn request_id(&self) -> &str {
        self.headers
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_from_request_drops_query() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("http://gateway/b.txt?op=DELETE")
            .header("origin", "http://igv.example")
            .header("range", "bytes=5-8")
            .body(Body::empty())
            .unwrap();
        let inbound = InboundRequest::from_request(&request);

        assert_eq!(inbound.path, "/b.txt");
        assert!(inbound.origin_present);
        assert_eq!(inbound.range().as_deref(), Some("bytes=5-8"));
        assert!(!inbound.accepts_gzip());
        assert_eq!(inbound.request_id(), "unknown");
    }

    #[test]
    fn test_empty_range_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::RANGE, " ".parse().unwrap());
        let inbound = InboundRequest::new(Method::GET, "/b.txt", headers);
        assert_eq!(inbound.range(), None);
        assert!(!inbound.origin_present);
    }
}

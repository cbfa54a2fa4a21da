//! Core request translation.
//!
//! # Responsibilities
//! - Gate methods (GET, HEAD, OPTIONS)
//! - Translate plain, ranged and metadata-only requests into backend calls
//! - Apply the path-triggered transform, compression and CORS, in that order
//! - Never emit a body for a successful HEAD
//!
//! # Design Decisions
//! - Stateless: one pass per request, nothing survives between requests
//! - Backend calls within a request are strictly sequential
//! - Every failure is rendered into a response; nothing is returned as `Err`

use axum::http::{header, HeaderValue, Method, StatusCode};
use bytes::Bytes;
use percent_encoding::percent_decode_str;

use crate::backend::{Backend, BackendError};
use crate::config::GatewayConfig;
use crate::http::compression::{compress_response, Compressor, GzipCompressor};
use crate::http::cors::apply_cors;
use crate::http::range::ByteRange;
use crate::http::request::InboundRequest;
use crate::http::response::OutboundResponse;
use crate::transform::{ContentTransform, TransformRoute, VcfFixer};

use std::sync::Arc;

/// Where a request path is read from, and whether its body is rewritten.
struct Target<'a> {
    path: String,
    transform: Option<&'a dyn ContentTransform>,
}

/// The request-translation engine in front of a `Backend`.
pub struct Gateway<B> {
    backend: B,
    compressor: Box<dyn Compressor>,
    transform: Option<TransformRoute>,
}

impl<B: Backend> Gateway<B> {
    /// A gateway with default gzip and no transform.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            compressor: Box::new(GzipCompressor::default()),
            transform: None,
        }
    }

    /// A gateway wired the way `config` describes.
    pub fn from_config(backend: B, config: &GatewayConfig) -> Self {
        let mut gateway = Self::new(backend)
            .with_compressor(GzipCompressor::new(config.compression.gzip_level));
        if config.transform.enabled {
            gateway = gateway.with_transform(TransformRoute::new(
                config.transform.trigger_suffix.clone(),
                config.transform.resource_suffix.clone(),
                Arc::new(VcfFixer::default()),
            ));
        }
        gateway
    }

    pub fn with_compressor(mut self, compressor: impl Compressor + 'static) -> Self {
        self.compressor = Box::new(compressor);
        self
    }

    pub fn with_transform(mut self, route: TransformRoute) -> Self {
        self.transform = Some(route);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Translate one request into one response.
    pub async fn handle(&self, request: &InboundRequest) -> OutboundResponse {
        let mut response = match request.method {
            Method::GET | Method::HEAD => self.dispatch(request).await,
            Method::OPTIONS => OutboundResponse::preflight(),
            ref other => {
                tracing::warn!(method = %other, path = %request.path, "Method not allowed");
                return OutboundResponse::text(
                    StatusCode::METHOD_NOT_ALLOWED,
                    format!("Method {other} not allowed."),
                );
            }
        };

        compress_response(
            &mut response,
            &request.method,
            request.accepts_gzip(),
            self.compressor.as_ref(),
        );
        apply_cors(&mut response, request.origin_present);

        if request.method == Method::HEAD && response.status == StatusCode::OK {
            response.body = Bytes::new();
        }
        response
    }

    async fn dispatch(&self, request: &InboundRequest) -> OutboundResponse {
        if !is_safe_path(&request.path) {
            tracing::warn!(path = %request.path, "Rejected path");
            return OutboundResponse::text(
                StatusCode::BAD_REQUEST,
                format!("Invalid path {}", request.path),
            );
        }
        let target = self.resolve(&request.path);

        if let Some(value) = request.range() {
            return match ByteRange::parse(&value) {
                Ok(range) => self.ranged(&target.path, range).await,
                Err(e) => {
                    tracing::debug!(range = %value, "Malformed Range header");
                    OutboundResponse::text(StatusCode::BAD_REQUEST, e.to_string())
                }
            };
        }

        match (&request.method, target.transform) {
            (&Method::HEAD, None) => self.metadata(&target.path).await,
            _ => self.full(&target).await,
        }
    }

    fn resolve(&self, path: &str) -> Target<'_> {
        if let Some(route) = &self.transform {
            if let Some(resource) = route.resolve(path) {
                tracing::debug!(path = %path, resource = %resource, "Transform route matched");
                return Target {
                    path: resource,
                    transform: Some(route.transform()),
                };
            }
        }
        Target {
            path: path.to_string(),
            transform: None,
        }
    }

    /// Whole-file read, transformed when the target asks for it.
    async fn full(&self, target: &Target<'_>) -> OutboundResponse {
        match self.backend.fetch_content(&target.path, None).await {
            Ok(body) => {
                let body = match target.transform {
                    Some(transform) => Bytes::from(transform.apply(&body)),
                    None => body,
                };
                OutboundResponse::text(StatusCode::OK, body)
            }
            Err(e) => OutboundResponse::from_backend_error(&e),
        }
    }

    /// Length-only answer for HEAD; the body is never transferred.
    async fn metadata(&self, path: &str) -> OutboundResponse {
        match self.backend.fetch_length(path).await {
            Ok(length) => OutboundResponse::head(length),
            Err(e) => OutboundResponse::from_backend_error(&e),
        }
    }

    /// Partial read followed by a total-length lookup.
    ///
    /// The lookup is repeated on every ranged request (nothing is cached).
    /// If it fails for any reason, the whole response becomes a 500 even
    /// though the partial read succeeded.
    async fn ranged(&self, path: &str, range: ByteRange) -> OutboundResponse {
        let body = match self.backend.fetch_content(path, Some(range.window())).await {
            Ok(body) => body,
            Err(e) => return OutboundResponse::from_backend_error(&e),
        };

        let total = match self.backend.fetch_length(path).await {
            Ok(total) => total,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Total length lookup failed");
                return OutboundResponse::from_backend_error(&BackendError::LengthUnavailable {
                    path: path.to_string(),
                });
            }
        };

        let mut response = OutboundResponse::text(StatusCode::PARTIAL_CONTENT, body);
        response.set_header(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        response.set_header(
            header::CONTENT_RANGE,
            HeaderValue::from_str(&range.content_range(total))
                .unwrap_or_else(|_| HeaderValue::from_static("bytes */*")),
        );
        response
    }
}

/// Absolute, and no segment decodes to `.`, `..` or something containing a
/// separator, so the backend URL cannot escape the configured prefix.
fn is_safe_path(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    rest.split('/')
        .all(|segment| match percent_decode_str(segment).decode_utf8() {
            Ok(decoded) => {
                !matches!(&*decoded, "." | "..") && !decoded.contains(['/', '\\'])
            }
            Err(_) => false,
        })
}

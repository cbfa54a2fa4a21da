//! Response composition.
//!
//! # Responsibilities
//! - Hold status, ordered headers and body for one outgoing response
//! - Build the text/plain success and failure shapes
//! - Replace headers in place so decorators keep the original order
//! - Convert into an axum response at the edge
//!
//! # Design Decisions
//! - Header order is part of the contract, so a `Vec` of pairs is used
//!   instead of a `HeaderMap`
//! - `set_header` replaces an existing header where it stands and only
//!   appends names that are new

use axum::{
    body::Body,
    http::{
        header::{self, HeaderName, HeaderValue},
        StatusCode,
    },
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::backend::BackendError;

/// A fully composed response, before it is handed to the HTTP stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub headers: Vec<(HeaderName, HeaderValue)>,
    pub body: Bytes,
}

impl OutboundResponse {
    /// A text/plain response whose `Content-Length` matches `body`.
    pub fn text(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self {
            status,
            headers: vec![
                (header::CONTENT_TYPE, HeaderValue::from_static("text/plain")),
                (header::CONTENT_LENGTH, HeaderValue::from(body.len())),
            ],
            body,
        }
    }

    /// A metadata-only response advertising `length` bytes with no body.
    pub fn head(length: u64) -> Self {
        Self {
            status: StatusCode::OK,
            headers: vec![
                (header::CONTENT_TYPE, HeaderValue::from_static("text/plain")),
                (header::CONTENT_LENGTH, HeaderValue::from(length)),
            ],
            body: Bytes::new(),
        }
    }

    /// The fixed CORS preflight answer.
    pub fn preflight() -> Self {
        Self {
            status: StatusCode::OK,
            headers: vec![
                (
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("HEAD, GET, OPTIONS"),
                ),
                (
                    header::ACCESS_CONTROL_MAX_AGE,
                    HeaderValue::from_static("1728000"),
                ),
            ],
            body: Bytes::new(),
        }
    }

    /// Render a backend failure.
    ///
    /// Remote failures keep the store's status and message. A missing total
    /// length becomes a 500, and an unreachable store a 502.
    pub fn from_backend_error(err: &BackendError) -> Self {
        let status = match err {
            BackendError::Remote { status, .. } => *status,
            BackendError::LengthUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            BackendError::Transport(_)
            | BackendError::UnexpectedPayload { .. }
            | BackendError::InvalidUrl { .. } => StatusCode::BAD_GATEWAY,
        };
        Self::text(status, err.to_string())
    }

    /// `"<code> <reason>"`, e.g. `"206 Partial Content"`.
    pub fn status_line(&self) -> String {
        format!(
            "{} {}",
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("")
        )
    }

    pub fn header(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Replace `name` where it stands, or append it if absent.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        match self.headers.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Headers as `(name, value)` string pairs, in order.
    pub fn header_pairs(&self) -> Vec<(&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.to_str().unwrap_or("")))
            .collect()
    }
}

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        for (name, value) in self.headers {
            headers.append(name, value);
        }
        response
    }
}

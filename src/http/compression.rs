//! Conditional gzip re-encoding of response bodies.

use std::io::{self, Write};

use axum::http::{
    header::{self, HeaderMap, HeaderValue},
    Method, StatusCode,
};
use bytes::Bytes;
use flate2::{write::GzEncoder, Compression};

use crate::http::response::OutboundResponse;

/// Produces a gzip encoding of a body.
pub trait Compressor: Send + Sync {
    fn compress(&self, body: &[u8]) -> io::Result<Vec<u8>>;
}

/// flate2-backed gzip at a fixed level.
#[derive(Debug, Clone, Copy)]
pub struct GzipCompressor {
    level: u32,
}

impl GzipCompressor {
    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self::new(6)
    }
}

impl Compressor for GzipCompressor {
    fn compress(&self, body: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::with_capacity(body.len()), Compression::new(self.level));
        encoder.write_all(body)?;
        encoder.finish()
    }
}

/// True when `Accept-Encoding` lists gzip with a non-zero quality.
pub fn accepts_gzip(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT_ENCODING)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|item| {
            let mut parts = item.split(';').map(str::trim);
            let coding = parts.next().unwrap_or("");
            if !coding.eq_ignore_ascii_case("gzip") {
                return false;
            }
            !parts.any(|param| {
                param
                    .strip_prefix("q=")
                    .and_then(|q| q.parse::<f32>().ok())
                    .is_some_and(|q| q == 0.0)
            })
        })
}

/// Gzip the body of an eligible response when that makes it smaller.
///
/// Eligible means a GET answered with 200 or 206 by a client that accepts
/// gzip. The compressed body is kept only if it is strictly shorter; the
/// response is otherwise left exactly as it was.
pub fn compress_response(
    response: &mut OutboundResponse,
    method: &Method,
    accepts_gzip: bool,
    compressor: &dyn Compressor,
) {
    let eligible_status = matches!(response.status, StatusCode::OK | StatusCode::PARTIAL_CONTENT);
    if *method != Method::GET || !eligible_status || !accepts_gzip {
        return;
    }

    let compressed = match compressor.compress(&response.body) {
        Ok(compressed) => compressed,
        Err(e) => {
            tracing::warn!(error = %e, "gzip failed, sending identity body");
            return;
        }
    };

    if compressed.len() >= response.body.len() {
        tracing::debug!(
            original = response.body.len(),
            compressed = compressed.len(),
            "Compression not profitable"
        );
        return;
    }

    response.set_header(header::CONTENT_LENGTH, HeaderValue::from(compressed.len()));
    response.set_header(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    response.body = Bytes::from(compressed);
}

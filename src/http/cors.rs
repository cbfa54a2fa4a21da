//! Permissive cross-origin headers.

use axum::http::header::{self, HeaderValue};

use crate::http::response::OutboundResponse;

/// Allow any origin to read the response and to send `Range`.
///
/// A no-op unless the request carried an `Origin` header.
pub fn apply_cors(response: &mut OutboundResponse, origin_present: bool) {
    if !origin_present {
        return;
    }
    response.set_header(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response.set_header(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Range"),
    );
}

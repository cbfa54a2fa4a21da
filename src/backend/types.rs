//! Backend capability and error definitions.

use std::future::Future;

use axum::http::StatusCode;
use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

/// A contiguous read window passed to the backend as `offset`/`length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWindow {
    pub offset: u64,
    pub length: u64,
}

/// Errors that can occur while talking to the file store.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The store answered with a non-200 status.
    #[error("{message}")]
    Remote { status: StatusCode, message: String },

    /// A content summary could not be turned into a length.
    #[error("Unable to get total length of {path}")]
    LengthUnavailable { path: String },

    /// The request never produced a response. The error carries no URL, so
    /// rendering it never exposes the backend address or `user.name`.
    #[error("Backend request failed: {0}")]
    Transport(reqwest::Error),

    /// The store answered 200 with a body of the wrong shape.
    #[error("Unexpected {op} payload: {reason}")]
    UnexpectedPayload { op: &'static str, reason: String },

    /// The request path could not be turned into a backend URL.
    #[error("Backend request failed: invalid URL for {path}: {reason}")]
    InvalidUrl { path: String, reason: String },
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.without_url())
    }
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// The two operations the gateway needs from a remote file store.
///
/// Implementations perform exactly one round trip per call, with no retries
/// and no caching.
pub trait Backend: Send + Sync {
    /// Fetch the content of `path`, optionally restricted to a window.
    fn fetch_content(
        &self,
        path: &str,
        window: Option<ReadWindow>,
    ) -> impl Future<Output = BackendResult<Bytes>> + Send;

    /// Fetch the total length of `path` in bytes.
    fn fetch_length(&self, path: &str) -> impl Future<Output = BackendResult<u64>> + Send;
}

/// Structured error payload returned by WebHDFS.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteExceptionEnvelope {
    remote_exception: RemoteException,
}

#[derive(Debug, Deserialize)]
struct RemoteException {
    message: String,
}

/// Pick the most useful human-readable message from an error body.
///
/// Prefers `RemoteException.message`; falls back to the raw text.
pub fn remote_message(body: &[u8]) -> String {
    match serde_json::from_slice::<RemoteExceptionEnvelope>(body) {
        Ok(envelope) => envelope.remote_exception.message,
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

/// Content summary payload returned by `op=GETCONTENTSUMMARY`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ContentSummaryEnvelope {
    pub content_summary: ContentSummary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentSummary {
    pub length: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_prefers_exception_message() {
        let body = br#"{"RemoteException":{"message":"File /c.txt does not exist.","exception":"FileNotFoundException"}}"#;
        assert_eq!(remote_message(body), "File /c.txt does not exist.");
    }

    #[test]
    fn test_remote_message_falls_back_to_text() {
        assert_eq!(remote_message(b"Service Unavailable"), "Service Unavailable");
        // Valid JSON with the wrong shape still falls back.
        assert_eq!(
            remote_message(br#"{"error":"nope"}"#),
            r#"{"error":"nope"}"#
        );
    }

    #[test]
    fn test_content_summary_parses_length() {
        let summary: ContentSummaryEnvelope =
            serde_json::from_str(r#"{"ContentSummary":{"directoryCount":0,"length":13}}"#)
                .unwrap();
        assert_eq!(summary.content_summary.length, 13);
    }

    #[test]
    fn test_error_display() {
        let err = BackendError::LengthUnavailable {
            path: "/b.txt".into(),
        };
        assert_eq!(err.to_string(), "Unable to get total length of /b.txt");

        let err = BackendError::Remote {
            status: StatusCode::NOT_FOUND,
            message: "File /c.txt does not exist.".into(),
        };
        assert_eq!(err.to_string(), "File /c.txt does not exist.");
    }
}

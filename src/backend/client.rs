//! WebHDFS (HttpFS) client.
//!
//! # Responsibilities
//! - Shape `/webhdfs/v1` URLs with pseudo-auth and operation parameters
//! - Read file content (optionally a window of it)
//! - Read total file length from the content summary
//! - Translate non-200 answers into `BackendError::Remote`

use std::time::Duration;

use axum::http::StatusCode;
use bytes::Bytes;
use percent_encoding::percent_decode_str;
use url::Url;

use crate::backend::types::{
    remote_message, Backend, BackendError, BackendResult, ContentSummaryEnvelope, ReadWindow,
};
use crate::config::BackendConfig;
use crate::observability::metrics;

/// WebHDFS operations used by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Open,
    GetContentSummary,
    ListStatus,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Open => "OPEN",
            Operation::GetContentSummary => "GETCONTENTSUMMARY",
            Operation::ListStatus => "LISTSTATUS",
        }
    }
}

/// HttpFS client bound to one endpoint, user and path prefix.
#[derive(Debug, Clone)]
pub struct WebHdfsClient {
    http: reqwest::Client,
    endpoint: String,
    user: String,
    prefix: String,
}

impl WebHdfsClient {
    /// Create a client from validated backend configuration.
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            prefix: config.path_prefix.clone(),
        })
    }

    /// Build the URL for `op` on `path`. Parameter order is
    /// `user.name`, `op`, then `extra` in the given order.
    ///
    /// `path` is the percent-encoded request path. Each segment is decoded
    /// and re-encoded by `url` as a single segment, so nothing in it can act
    /// as a separator or a dot segment. Segments that decode to `.` or `..`
    /// are refused outright.
    pub fn operation_url(
        &self,
        path: &str,
        op: Operation,
        extra: &[(&str, String)],
    ) -> BackendResult<Url> {
        let invalid = |reason: &str| BackendError::InvalidUrl {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let mut url = Url::parse(&format!("{}/webhdfs/v1", self.endpoint))
            .map_err(|e| invalid(&e.to_string()))?;

        let segments = path
            .strip_prefix('/')
            .unwrap_or(path)
            .split('/')
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy())
            .collect::<Vec<_>>();
        if segments.iter().any(|s| matches!(&**s, "." | "..")) {
            return Err(invalid("dot segment"));
        }

        url.path_segments_mut()
            .map_err(|()| invalid("endpoint cannot be a base URL"))?
            .pop_if_empty()
            .extend(self.prefix.split('/').filter(|s| !s.is_empty()))
            .extend(&segments);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("user.name", &self.user);
            query.append_pair("op", op.as_str());
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Issue a GET and return the body of a 200 answer.
    async fn get(&self, url: Url, op: Operation) -> BackendResult<Bytes> {
        tracing::debug!(url = %url, op = op.as_str(), "Backend request");

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_backend_call(op.as_str(), "transport_error");
                tracing::warn!(error = %e, op = op.as_str(), "Backend unreachable");
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.bytes().await?;

        if status != StatusCode::OK {
            metrics::record_backend_call(op.as_str(), "remote_failure");
            let message = remote_message(&body);
            tracing::warn!(status = %status, op = op.as_str(), message = %message, "Backend returned failure");
            return Err(BackendError::Remote { status, message });
        }

        metrics::record_backend_call(op.as_str(), "ok");
        Ok(body)
    }

    /// Verify that HttpFS answers a directory listing of the root.
    pub async fn check_connection(&self) -> BackendResult<()> {
        let url = self.operation_url("/", Operation::ListStatus, &[])?;
        let body = self.get(url.clone(), Operation::ListStatus).await?;

        let listing: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| BackendError::UnexpectedPayload {
                op: Operation::ListStatus.as_str(),
                reason: e.to_string(),
            })?;
        if listing.get("FileStatuses").is_none() {
            return Err(BackendError::UnexpectedPayload {
                op: Operation::ListStatus.as_str(),
                reason: format!("{url} returned no FileStatuses"),
            });
        }

        tracing::info!(endpoint = %self.endpoint, "HttpFS connection verified");
        Ok(())
    }
}

impl Backend for WebHdfsClient {
    async fn fetch_content(&self, path: &str, window: Option<ReadWindow>) -> BackendResult<Bytes> {
        let extra = match window {
            Some(w) => vec![("offset", w.offset.to_string()), ("length", w.length.to_string())],
            None => Vec::new(),
        };
        let url = self.operation_url(path, Operation::Open, &extra)?;
        self.get(url, Operation::Open).await
    }

    async fn fetch_length(&self, path: &str) -> BackendResult<u64> {
        let url = self.operation_url(path, Operation::GetContentSummary, &[])?;
        let body = self.get(url, Operation::GetContentSummary).await?;

        match serde_json::from_slice::<ContentSummaryEnvelope>(&body) {
            Ok(summary) => Ok(summary.content_summary.length),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Malformed content summary");
                Err(BackendError::LengthUnavailable {
                    path: path.to_string(),
                })
            }
        }
    }
}

//! Shared utilities for integration testing.
//!
//! `FakeHttpFs` answers the subset of the WebHDFS REST API the gateway uses
//! (`OPEN`, `GETCONTENTSUMMARY`, `LISTSTATUS`) from an in-memory file table.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use httpfs_gateway::config::GatewayConfig;
use httpfs_gateway::lifecycle::{self, Shutdown};

/// One request seen by the fake, reduced to what tests assert on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub path: String,
    pub op: String,
    pub user: Option<String>,
    pub offset: Option<u64>,
    pub length: Option<u64>,
}

#[derive(Default)]
struct FakeState {
    files: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<RecordedCall>>,
    broken_summary: AtomicBool,
}

/// Handle to a running fake HttpFS server.
#[derive(Clone)]
pub struct FakeHttpFs {
    pub addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeHttpFs {
    /// Base URL to use as the gateway's HttpFS endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.state.calls.lock().unwrap().clear();
    }

    /// Make every GETCONTENTSUMMARY answer 200 with a payload lacking `length`.
    pub fn break_summaries(&self) {
        self.state.broken_summary.store(true, Ordering::SeqCst);
    }
}

/// The files served by `start_default_httpfs`.
pub fn default_files() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("/b.txt", b"This is b.txt".to_vec()),
        ("/a/b/c.txt", b"This is c.txt".to_vec()),
        (
            "/sample.vcf/part-r-00000",
            b"##fileformat=VCFv4.1\n#CHROM\tPOS\tID\n1\t100\trs1\n".to_vec(),
        ),
        ("/repeat.txt", "ACGT".repeat(256).into_bytes()),
    ]
}

pub async fn start_default_httpfs() -> FakeHttpFs {
    start_httpfs(default_files()).await
}

/// Start a fake HttpFS on an ephemeral port.
pub async fn start_httpfs(files: Vec<(&'static str, Vec<u8>)>) -> FakeHttpFs {
    let state = Arc::new(FakeState {
        files: files
            .into_iter()
            .map(|(path, body)| (path.to_string(), body))
            .collect(),
        ..FakeState::default()
    });

    let app = Router::new()
        .route("/webhdfs/v1/", get(root))
        .route("/webhdfs/v1/{*path}", get(file))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    FakeHttpFs { addr, state }
}

async fn root(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    answer(&state, "/".to_string(), &params)
}

async fn file(
    State(state): State<Arc<FakeState>>,
    Path(path): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    answer(&state, format!("/{path}"), &params)
}

fn answer(state: &FakeState, path: String, params: &HashMap<String, String>) -> Response {
    let op = params.get("op").cloned().unwrap_or_default();
    let offset = params.get("offset").and_then(|v| v.parse().ok());
    let length = params.get("length").and_then(|v| v.parse().ok());
    state.calls.lock().unwrap().push(RecordedCall {
        path: path.clone(),
        op: op.clone(),
        user: params.get("user.name").cloned(),
        offset,
        length,
    });

    match op.as_str() {
        "LISTSTATUS" => Json(json!({ "FileStatuses": { "FileStatus": [] } })).into_response(),
        "OPEN" => match state.files.get(&path) {
            Some(body) => {
                let start = offset.unwrap_or(0).min(body.len() as u64) as usize;
                let end = match length {
                    Some(length) => (start as u64 + length).min(body.len() as u64) as usize,
                    None => body.len(),
                };
                body[start..end].to_vec().into_response()
            }
            None => not_found(&path),
        },
        "GETCONTENTSUMMARY" => match state.files.get(&path) {
            Some(_) if state.broken_summary.load(Ordering::SeqCst) => {
                Json(json!({ "ContentSummary": { "fileCount": 1 } })).into_response()
            }
            Some(body) => Json(json!({
                "ContentSummary": {
                    "directoryCount": 0,
                    "fileCount": 1,
                    "length": body.len(),
                    "quota": -1,
                    "spaceConsumed": body.len(),
                    "spaceQuota": -1
                }
            }))
            .into_response(),
            None => not_found(&path),
        },
        other => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "RemoteException": {
                    "exception": "IllegalArgumentException",
                    "javaClassName": "java.lang.IllegalArgumentException",
                    "message": format!("Invalid value for webhdfs parameter \"op\": {other}")
                }
            })),
        )
            .into_response(),
    }
}

fn not_found(path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "RemoteException": {
                "exception": "FileNotFoundException",
                "javaClassName": "java.io.FileNotFoundException",
                "message": format!("File does not exist: {path}")
            }
        })),
    )
        .into_response()
}

/// Gateway configuration pointing at `httpfs`, listening on an ephemeral port.
pub fn gateway_config(httpfs: &FakeHttpFs) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.backend.endpoint = httpfs.endpoint();
    config
}

/// A running gateway. Dropping it leaves the server running until the test
/// runtime ends; call `stop` to exercise graceful shutdown.
pub struct RunningGateway {
    pub base_url: String,
    pub shutdown: Shutdown,
    pub task: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl RunningGateway {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn stop(self) -> std::io::Result<()> {
        self.shutdown.trigger();
        self.task.await.unwrap()
    }
}

/// Start the gateway through the regular startup path.
pub async fn start_gateway(config: GatewayConfig) -> RunningGateway {
    let ready = lifecycle::start(config).await.unwrap();
    let base_url = format!("http://{}", ready.local_addr);
    let shutdown = Shutdown::new();
    let task = tokio::spawn(ready.server.run(ready.listener, shutdown.subscribe()));

    RunningGateway {
        base_url,
        shutdown,
        task,
    }
}

//! Startup orchestration.
//!
//! Order: metrics recorder, optional backend probe, listener bind. Any
//! failure is fatal and reported before traffic is accepted.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::backend::{BackendError, WebHdfsClient};
use crate::config::GatewayConfig;
use crate::http::HttpServer;
use crate::observability::metrics;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Unable to connect to HttpFS at {endpoint}: {source}")]
    Backend {
        endpoint: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start metrics endpoint: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// A server whose listener is bound and ready to serve.
pub struct Ready {
    pub server: HttpServer,
    pub listener: TcpListener,
    pub local_addr: SocketAddr,
}

/// Bring up every subsystem described by `config`.
pub async fn start(config: GatewayConfig) -> Result<Ready, StartupError> {
    if config.observability.metrics_enabled {
        // Validation already checked the address format.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr)?;
        }
    }

    let backend_error = |source| StartupError::Backend {
        endpoint: config.backend.endpoint.clone(),
        source,
    };
    let client = WebHdfsClient::new(&config.backend).map_err(backend_error)?;
    if config.backend.check_connection {
        client.check_connection().await.map_err(backend_error)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| StartupError::Bind {
        address: config.listener.bind_address.clone(),
        source,
    })?;

    tracing::info!(
        address = %local_addr,
        endpoint = %config.backend.endpoint,
        prefix = %config.backend.path_prefix,
        gzip_level = config.compression.gzip_level,
        "Gateway ready"
    );

    Ok(Ready {
        server: HttpServer::with_backend(config, client),
        listener,
        local_addr,
    })
}

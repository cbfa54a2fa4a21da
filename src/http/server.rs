//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router that sends every path and method to the gateway
//! - Wire up middleware (request ID, tracing, concurrency limit)
//! - Serve on a listener until the shutdown signal fires

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::backend::{Backend, BackendResult, WebHdfsClient};
use crate::config::GatewayConfig;
use crate::http::handler::Gateway;
use crate::http::request::{InboundRequest, X_REQUEST_ID};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a server talking to the HttpFS backend named in `config`.
    pub fn new(config: GatewayConfig) -> BackendResult<Self> {
        let client = WebHdfsClient::new(&config.backend)?;
        Ok(Self::with_backend(config, client))
    }

    /// Create a server in front of any backend.
    pub fn with_backend<B: Backend + 'static>(config: GatewayConfig, backend: B) -> Self {
        let gateway = Arc::new(Gateway::from_config(backend, &config));
        let router = Self::build_router(&config, gateway);
        Self {
            router,
            config: Arc::new(config),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router<B: Backend + 'static>(config: &GatewayConfig, gateway: Arc<Gateway<B>>) -> Router {
        Router::new()
            .route("/", any(gateway_handler::<B>))
            .route("/{*path}", any(gateway_handler::<B>))
            .with_state(gateway)
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_concurrent_requests,
            ))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The router, for driving the gateway without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoint = %self.config.backend.endpoint,
            user = %self.config.backend.user,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Every request lands here and is handed to the gateway.
async fn gateway_handler<B: Backend + 'static>(
    State(gateway): State<Arc<Gateway<B>>>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let inbound = InboundRequest::from_request(&request);

    tracing::debug!(
        request_id = %inbound.request_id(),
        method = %inbound.method,
        path = %inbound.path,
        range = ?inbound.range(),
        "Handling request"
    );

    let response = gateway.handle(&inbound).await;

    metrics::record_request(inbound.method.as_str(), response.status.as_u16(), start_time);
    tracing::info!(
        request_id = %inbound.request_id(),
        method = %inbound.method,
        path = %inbound.path,
        status = %response.status_line(),
        bytes = response.body.len(),
        "Request complete"
    );

    response.into_response()
}

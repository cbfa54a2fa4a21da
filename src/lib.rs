//! WebHDFS range gateway library.
//!
//! Serves HDFS files to HTTP clients that speak plain `GET`/`HEAD` with
//! `Range` headers, translating each request into HttpFS REST calls.

pub mod backend;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod transform;

pub use backend::{Backend, BackendError, WebHdfsClient};
pub use config::schema::GatewayConfig;
pub use http::{Gateway, HttpServer};
pub use lifecycle::Shutdown;

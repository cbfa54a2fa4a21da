//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, concurrency limit)
//!     → request.rs (method, path, Range, Accept-Encoding, Origin)
//!     → handler.rs (method gate, path check, range/full/metadata read)
//!         → range.rs (parse "bytes=first-last")
//!         → backend (HttpFS OPEN / GETCONTENTSUMMARY)
//!     → compression.rs (gzip when accepted and smaller)
//!     → cors.rs (Access-Control-* when Origin is present)
//!     → response.rs (status, headers, body)
//!     → Send to client
//! ```

pub mod compression;
pub mod cors;
pub mod handler;
pub mod range;
pub mod request;
pub mod response;
pub mod server;

pub use compression::{Compressor, GzipCompressor};
pub use handler::Gateway;
pub use range::{ByteRange, RangeError};
pub use request::{InboundRequest, X_REQUEST_ID};
pub use response::OutboundResponse;
pub use server::HttpServer;

//! Remote file store subsystem.
//!
//! # Data Flow
//! ```text
//! core handler
//!     → Backend trait (fetch_content / fetch_length)
//!     → client.rs (WebHDFS URL shaping, one HTTP round trip)
//!     → types.rs (BackendError: remote failure, missing length, transport)
//! ```
//!
//! # Design Decisions
//! - No retries and no caching: every call is one round trip
//! - Remote failures carry the store's status and its best message
//! - The core handler only sees the trait, so tests use an in-memory store

pub mod client;
pub mod types;

pub use client::{Operation, WebHdfsClient};
pub use types::{remote_message, Backend, BackendError, BackendResult, ReadWindow};

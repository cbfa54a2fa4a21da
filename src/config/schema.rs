//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, concurrency).
    pub listener: ListenerConfig,

    /// HttpFS backend settings.
    pub backend: BackendConfig,

    /// Response compression settings.
    pub compression: CompressionConfig,

    /// Path-triggered content transform.
    pub transform: TransformConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:9876").
    pub bind_address: String,

    /// Maximum requests handled concurrently across all connections.
    pub max_concurrent_requests: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:9876".to_string(),
            max_concurrent_requests: 1024,
        }
    }
}

/// HttpFS backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the HttpFS server, without the `/webhdfs/v1` suffix.
    pub endpoint: String,

    /// User passed as `user.name` for pseudo-authentication.
    pub user: String,

    /// Restricts requests to an HDFS directory. With "/a/b/c", a request
    /// for "/d/e.txt" reads "/a/b/c/d/e.txt".
    pub path_prefix: String,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Probe the backend with LISTSTATUS before accepting traffic.
    pub check_connection: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:14000".to_string(),
            user: "igv".to_string(),
            path_prefix: String::new(),
            connect_timeout_secs: 5,
            check_connection: false,
        }
    }
}

/// Compression configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CompressionConfig {
    /// gzip level, 1 (fastest) through 9 (smallest).
    pub gzip_level: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self { gzip_level: 6 }
    }
}

/// Content transform configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TransformConfig {
    /// Enable the VCF repair transform.
    pub enabled: bool,

    /// Request path suffix that triggers the transform.
    pub trigger_suffix: String,

    /// Suffix appended (after stripping the trigger) to find the real file.
    pub resource_suffix: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_suffix: ".fixed.vcf".to_string(),
            resource_suffix: ".vcf/part-r-00000".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_httpfs_conventions() {
        let config = GatewayConfig::default();
        assert_eq!(config.backend.endpoint, "http://localhost:14000");
        assert_eq!(config.backend.user, "igv");
        assert!(config.backend.path_prefix.is_empty());
        assert_eq!(config.compression.gzip_level, 6);
        assert_eq!(config.listener.bind_address, "127.0.0.1:9876");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [backend]
            user = "alice"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.user, "alice");
        assert_eq!(config.backend.endpoint, "http://localhost:14000");
        assert!(config.transform.enabled);
    }
}

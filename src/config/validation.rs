//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! All violations are collected so an operator sees every problem at once.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("listener.max_concurrent_requests must be greater than zero")]
    ZeroConcurrency,

    #[error("backend.endpoint '{0}' is not an absolute http(s) URL")]
    Endpoint(String),

    #[error("backend.path_prefix '{0}' must be empty or start with '/' and not end with '/'")]
    PathPrefix(String),

    #[error("compression.gzip_level {0} is outside 1..=9")]
    GzipLevel(u32),

    #[error("transform.trigger_suffix must not be empty when the transform is enabled")]
    EmptyTrigger,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, returning every violation found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_concurrent_requests == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }

    let endpoint_ok = Url::parse(&config.backend.endpoint)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false);
    if !endpoint_ok {
        errors.push(ValidationError::Endpoint(config.backend.endpoint.clone()));
    }

    let prefix = &config.backend.path_prefix;
    if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
        errors.push(ValidationError::PathPrefix(prefix.clone()));
    }

    if !(1..=9).contains(&config.compression.gzip_level) {
        errors.push(ValidationError::GzipLevel(config.compression.gzip_level));
    }

    if config.transform.enabled && config.transform.trigger_suffix.is_empty() {
        errors.push(ValidationError::EmptyTrigger);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.compression.gzip_level = 0;
        config.backend.endpoint = "localhost:14000".into();
        config.backend.path_prefix = "a/b/".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::GzipLevel(0)));
        assert!(errors.contains(&ValidationError::PathPrefix("a/b/".into())));
    }

    #[test]
    fn test_prefix_rules() {
        let mut config = GatewayConfig::default();
        config.backend.path_prefix = "/a/b/c".into();
        assert!(validate_config(&config).is_ok());

        config.backend.path_prefix = "/a/b/c/".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_gzip_level_bounds() {
        let mut config = GatewayConfig::default();
        config.compression.gzip_level = 9;
        assert!(validate_config(&config).is_ok());
        config.compression.gzip_level = 10;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::GzipLevel(10)]
        );
    }
}

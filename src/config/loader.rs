//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::overrides::ConfigOverrides;
use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file into a configuration without validating it.
pub fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Build the process configuration: defaults, then the optional file, then
/// environment/CLI overrides. The result is validated before it is returned.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => GatewayConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = load_config(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_file_then_overrides() {
        let path = std::env::temp_dir().join("httpfs_gateway_loader_test.toml");
        fs::write(
            &path,
            "[backend]\nuser = \"from-file\"\npath_prefix = \"/data\"\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            hdfs_user: Some("from-cli".into()),
            ..Default::default()
        };
        let config = load_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.backend.user, "from-cli");
        assert_eq!(config.backend.path_prefix, "/data");

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(
            Some(Path::new("/nonexistent/httpfs-gateway.toml")),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let overrides = ConfigOverrides {
            gzip_level: Some(12),
            ..Default::default()
        };
        let err = load_config(None, &overrides).unwrap_err();
        assert!(err.to_string().contains("gzip_level 12"));
    }
}

//! Command-line and environment overrides.
//!
//! Every flag can also be supplied through the environment variable named
//! next to it; clap resolves flag > env. Values left unset keep whatever the
//! defaults or the config file provided.

use clap::Args;

use crate::config::schema::GatewayConfig;

/// Overrides layered on top of the file configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Address to listen on.
    #[arg(long, env = "GATEWAY_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Base URL of the HttpFS server.
    #[arg(long, env = "HTTPFS_ENDPOINT")]
    pub httpfs_endpoint: Option<String>,

    /// User to pass to HttpFS for pseudo-authentication.
    #[arg(long, env = "HDFS_USER")]
    pub hdfs_user: Option<String>,

    /// Restrict requests to a particular HDFS directory.
    #[arg(long, env = "HDFS_PREFIX")]
    pub hdfs_prefix: Option<String>,

    /// gzip compression level (1-9).
    #[arg(long, env = "GZIP_LEVEL")]
    pub gzip_level: Option<u32>,

    /// Verify HttpFS is reachable before serving.
    #[arg(long)]
    pub check_connection: bool,
}

impl ConfigOverrides {
    /// Apply the set overrides onto `config`.
    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(addr) = &self.bind_address {
            config.listener.bind_address = addr.clone();
        }
        if let Some(endpoint) = &self.httpfs_endpoint {
            config.backend.endpoint = endpoint.clone();
        }
        if let Some(user) = &self.hdfs_user {
            config.backend.user = user.clone();
        }
        if let Some(prefix) = &self.hdfs_prefix {
            config.backend.path_prefix = prefix.clone();
        }
        if let Some(level) = self.gzip_level {
            config.compression.gzip_level = level;
        }
        if self.check_connection {
            config.backend.check_connection = true;
        }
    }
}

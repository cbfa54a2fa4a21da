//! WebHDFS range gateway.
//!
//! Exposes HDFS files over plain HTTP so genome browsers and other byte-range
//! clients can read them without speaking the WebHDFS protocol.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                   GATEWAY                    │
//!     Client Request     │  ┌─────────┐    ┌─────────┐    ┌──────────┐  │
//!     ───────────────────┼─▶│  http   │───▶│ handler │───▶│ backend  │──┼──▶ HttpFS
//!                        │  │ server  │    │ (range) │    │ (client) │  │
//!                        │  └─────────┘    └────┬────┘    └──────────┘  │
//!                        │                      │                       │
//!     Client Response    │  ┌─────────┐    ┌────▼─────┐                 │
//!     ◀──────────────────┼──│  cors   │◀───│ compress │◀── transform    │
//!                        │  └─────────┘    └──────────┘                 │
//!                        │                                              │
//!                        │  config · lifecycle · observability          │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use httpfs_gateway::config::{load_config, ConfigOverrides};
use httpfs_gateway::lifecycle::{self, signals, Shutdown};
use httpfs_gateway::observability::logging;

/// HTTP gateway translating range requests into HttpFS calls.
#[derive(Debug, Parser)]
#[command(name = "httpfs-gateway", version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), &cli.overrides)?;

    logging::init(&config.observability.log_level);
    tracing::info!("httpfs-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let ready = match lifecycle::start(config).await {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    ready.server.run(ready.listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

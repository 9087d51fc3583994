/*!
 * virtuoso-health - serves the database host's health snapshot over HTTP
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use virtuoso_health::logging::{init_logging, LogOptions};
use virtuoso_health::{server, ProbeConfig};

/// HTTP health-check probe for a Virtuoso database host
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overrides the configuration file
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on, overrides the configuration file
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    init_logging(LogOptions {
        json: args.json_logs,
        debug: args.debug,
    })?;

    let mut config = match &args.config {
        Some(path) => ProbeConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ProbeConfig::default(),
    };

    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate()?;

    tracing::info!("virtuoso-health v{}", virtuoso_health::VERSION);

    server::run_server(config).await
}

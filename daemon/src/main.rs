//! tripwire daemon binary
//!
//! Listens for HTTP triggers and runs the probe script once per trigger.

#![allow(unused_crate_dependencies)]

use clap::Parser;
use daemon::Daemon;
use schema::DaemonConfig;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tripwire_core::utils::{init_tracing, validate_config};

#[derive(Parser)]
#[command(name = "tripwire")]
#[command(about = "Run a script of HTTP probes every time the daemon is triggered")]
#[command(version)]
struct Cli {
    /// Port to listen for incoming requests
    #[arg(long, default_value_t = 8023)]
    port: u16,

    /// Host to bind the listener to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Path to the probe script
    #[arg(long, alias = "scriptPath", default_value = "script.json")]
    script_path: PathBuf,

    /// Dump full raw requests and log at debug level
    #[arg(long)]
    verbose: bool,

    /// Accept invalid TLS certificates from probed servers
    #[arg(long)]
    insecure: bool,

    /// Seconds to wait for response headers before a probe times out
    #[arg(long, default_value_t = 10)]
    header_timeout: u64,
}

impl From<Cli> for DaemonConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            script_path: cli.script_path,
            verbose: cli.verbose,
            accept_invalid_certs: cli.insecure,
            response_header_timeout_secs: cli.header_timeout,
        }
    }
}

#[tokio::main]
async fn main() -> daemon::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    init_tracing(level)?;

    let config = DaemonConfig::from(cli);
    validate_config(&config)?;
    if config.accept_invalid_certs {
        warn!("TLS certificate validation is disabled for probed servers");
    }

    let daemon = Daemon::new(config);
    match daemon.preflight().await {
        Ok(count) => info!("Probe script loaded with {} probe(s)", count),
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    }

    if let Err(e) = daemon.start().await {
        error!("Daemon failed: {}", e);
        return Err(e);
    }

    info!("Daemon stopped");
    Ok(())
}

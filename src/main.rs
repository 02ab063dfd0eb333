//! Hardened Static Asset Server
//!
//! A small HTTP server that serves a whitelisted set of static files.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │               ASSET SERVER                    │
//!                      │                                               │
//!   Client Request     │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   ───────────────────┼─▶│ access │──▶│ security │──▶│ rate       │  │
//!                      │  │ log    │   │ headers  │   │ limiter    │  │
//!                      │  └────────┘   └──────────┘   └─────┬──────┘  │
//!                      │                                    │         │
//!                      │                                    ▼         │
//!                      │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   Client Response    │  │ CSP    │◀──│ MIME +   │◀──│ path       │  │
//!   ◀──────────────────┼──│ nonce  │   │ file read│   │ validator  │  │
//!                      │  └────────┘   └──────────┘   └────────────┘  │
//!                      │                                               │
//!                      │  Cross-cutting: config, logging, lifecycle    │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use asset_server::config::loader::{apply_env_overrides, finalize, load_file};
use asset_server::http::HttpServer;
use asset_server::lifecycle::{signals, Shutdown};
use asset_server::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "asset-server")]
#[command(about = "Hardened static asset server")]
struct Args {
    /// Path to a TOML configuration file (defaults apply without one).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listening port (also settable via PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the document root directory.
    #[arg(short, long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_file(args.config.as_deref())?;
    logging::init_logging(&config.observability.log_level);

    // Environment overlay after logging so bad values are warned about.
    apply_env_overrides(&mut config);
    if let Some(port) = args.port {
        config.listener.set_port(port);
    }
    if let Some(root) = args.root {
        config.site.document_root = root;
    }
    finalize(&config)?;

    tracing::info!("asset-server v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        document_root = %config.site.document_root.display(),
        environment = ?config.environment,
        rate_limit = config.rate_limit.max_requests,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Arc::new(Shutdown::new());
    let signal_trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        signal_trigger.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Parser;
use restoration_node::{
    api::{start_server, AppState},
    config::ServiceConfig,
    restoration::RestorationService,
    version,
};
use std::{env, net::SocketAddr};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Room restoration HTTP node
#[derive(Parser, Debug)]
#[command(name = "restoration-node")]
#[command(version = version::VERSION_NUMBER)]
#[command(about = "Restyles room photos through a remote image generation API", long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind
    #[arg(long, env = "API_PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    info!("Starting {}", version::get_version_string());

    let config = ServiceConfig::from_env().map_err(|e| anyhow!(e))?;
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {}", e))?;

    let shutdown = CancellationToken::new();
    let restorer = RestorationService::from_config(&config)?.with_shutdown(shutdown.clone());
    let state = AppState::new(restorer);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            wait_for_signal().await;
            warn!("Shutdown signal received, cancelling pending restorations");
            shutdown.cancel();
        }
    });

    start_server(addr, state, shutdown).await?;

    info!("Restoration node stopped");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

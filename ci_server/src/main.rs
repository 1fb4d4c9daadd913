//! CI notifier host: receives CI server events over HTTP and fans them out
//! as chat-webhook notifications.
//!
//! Recipient webhook settings and project names come from a directory file;
//! everything else is handled by the `ci_notify` core.

mod config;
mod directory;
mod metrics;
mod routes;
mod signature;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use ci_notify::{NotificationDispatcher, WebhookClient};
use clap::Parser;

use crate::directory::Directory;

#[derive(Parser)]
#[command(name = "ci-notify", about = "CI chat-webhook notifier")]
struct Cli {
    /// Server port
    #[arg(short, long, env = "NOTIFY_PORT", default_value = "9191")]
    port: u16,

    /// JSON file with project names and per-user webhook settings
    #[arg(long, env = "NOTIFY_DIRECTORY")]
    directory: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    }

    let cli = Cli::parse();

    tracing::info!("Starting CI notifier...");

    let notify_config = config::NotifyConfig::from_env();
    let directory = Arc::new(Directory::load(&cli.directory)?);
    let client = WebhookClient::new(notify_config.client_config())
        .context("failed to build webhook client")?;
    let dispatcher = NotificationDispatcher::new(directory.clone(), directory, client);

    let app = routes::notify_router(routes::NotifyRouterState {
        dispatcher,
        config: notify_config,
    });

    // Initialize metrics
    metrics::init_metrics();

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    tracing::info!("CI notifier listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}

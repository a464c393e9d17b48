#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod env_file;

use args::Args;
use clap::Parser;
use koe_config::Config;
use koe_server::Server;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Variables already set in the environment win over `.env`
    let env_file = env_file::load(dotenvy::dotenv());

    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };

    if let Some(listen) = args.listen {
        config.server.listen_address = Some(listen);
    }

    koe_telemetry::init(&config.telemetry)?;

    match env_file {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "loaded environment file"),
        Ok(None) => {}
        Err(e) => tracing::warn!("failed to read .env file: {e}"),
    }

    let config_source = args
        .config
        .as_ref()
        .map_or_else(|| "environment".to_string(), |path| path.display().to_string());

    tracing::info!(
        config = %config_source,
        listen_address = %config.server.listen_address(),
        summary_key_configured = config.summary.api_key.is_some(),
        "starting koe"
    );

    let server = Server::new(config).await?;

    // Set up graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    server.serve(shutdown).await?;

    tracing::info!("koe stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
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
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}

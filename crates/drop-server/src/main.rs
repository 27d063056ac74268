use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drop_core::format_size;
use drop_server::{router, AppState, Cli, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drop_server=info,drop_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::try_from(Cli::parse())?;

    if config.uses_default_password() {
        tracing::warn!("FILESHARING_PASSWORD is not set, using the built-in default password");
    }
    if config.secret_key.is_none() {
        tracing::warn!("SECRET_KEY is not set, sessions will not survive a restart");
    }

    let state = AppState::from_config(&config)
        .await
        .context("Failed to open storage")?;

    tracing::info!("Upload directory: {}", config.upload_dir.display());
    tracing::info!("Shared text file: {}", config.shared_text_path.display());
    tracing::info!("Max upload size: {}", format_size(config.max_upload_bytes));

    let app = router(state);

    tracing::info!("Starting drop-server on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("drop-server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

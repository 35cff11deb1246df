use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::broadcast;

use flashcard_bot::config::Config;
use flashcard_bot::logging;
use flashcard_bot::transport::TelegramTransport;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = logging::init_tracing(&config);

    let controller = match flashcard_bot::create_controller(&config).await {
        Ok(controller) => Arc::new(controller),
        Err(err) => {
            tracing::error!(error = %err, path = %config.database_path.display(), "failed to open word store");
            return ExitCode::FAILURE;
        }
    };

    let transport = match TelegramTransport::new(config.bot_token.clone(), config.poll_timeout) {
        Ok(transport) => Arc::new(transport),
        Err(err) => {
            tracing::error!(error = %err, "failed to build telegram client");
            return ExitCode::FAILURE;
        }
    };

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let poller = tokio::spawn(Arc::clone(&transport).run(Arc::clone(&controller), shutdown_rx));
    tracing::info!(path = %config.database_path.display(), "flashcard bot started");

    shutdown_signal().await;
    tracing::info!("shutdown signal received, stopping poller");
    let _ = shutdown_tx.send(());

    if let Err(err) = poller.await {
        tracing::error!(error = %err, "poller task failed");
    }

    controller.store().close().await;
    tracing::info!("Graceful shutdown complete");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
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

//! Inference gateway HTTP server

use std::{future::IntoFuture, time::Duration};

use ai_core::EngineSelector;
use application::ChatService;
use infrastructure::{AppConfig, init_telemetry};
use presentation_http::{AppState, create_router};
use tokio::{net::TcpListener, signal, sync::oneshot};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default().with_env_overrides(), Some(e)),
    };

    init_telemetry(&config.telemetry, config.server.log_format)?;

    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        remote = %config.remote.base_url,
        model = %config.remote.model,
        "Inference gateway starting"
    );

    let selector = EngineSelector::new(config.remote.clone());
    let state = AppState::new(ChatService::new(selector));
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let shutdown_timeout = config.server.shutdown_timeout();
    tokio::select! {
        result = server => result?,
        () = drain_deadline(signalled_rx, shutdown_timeout) => {
            warn!(timeout = ?shutdown_timeout, "Connections still open after shutdown timeout, exiting");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Completes `timeout` after shutdown was signalled
async fn drain_deadline(signalled: oneshot::Receiver<()>, timeout: Duration) {
    if signalled.await.is_ok() {
        info!(timeout = ?timeout, "Waiting for open connections to close");
        tokio::time::sleep(timeout).await;
    } else {
        std::future::pending::<()>().await;
    }
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

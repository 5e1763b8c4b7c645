//! tierpay engine binary.
//!
//! - Loads `TIERPAY_CONFIG` (default `tierpay.yaml`), strict parsing + validate
//! - Initializes the policy at boot when the config has a `project` section
//! - Serves the host adapter and ops endpoints until SIGINT/SIGTERM

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tierpay_core::TierPayError;
use tierpay_engine::{app_state, config, obs::PolicyMetrics, router};

#[derive(Debug, Error)]
enum BootError {
    #[error("config: {0}")]
    Config(#[from] TierPayError),
    #[error("server.listen is not a socket address: {0}")]
    Listen(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), BootError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let state = app_state::AppState::new(cfg)?;

    let listen_raw = &state.cfg().server.listen;
    let listen: SocketAddr = listen_raw
        .parse()
        .map_err(|_| BootError::Listen(listen_raw.clone()))?;
    let metrics = state.metrics();
    let app = router::build_router(state);

    tracing::info!(%listen, config=%path, "tierpay-engine starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(metrics))
        .await?;
    Ok(())
}

async fn shutdown_signal(metrics: std::sync::Arc<PolicyMetrics>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error=%e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error=%e, "failed to install SIGTERM handler");
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
    metrics.set_draining();
    tracing::info!("signal received, starting graceful shutdown");
}

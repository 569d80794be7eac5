//! dform-api server entry point.
//!
//! Reads configuration from the environment (see [`AppConfig`]), loads the
//! descriptor list, builds the validation schema once, and serves HTTP.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use dform_api::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let port = config.port;
    let state = AppState::with_config(config).context("failed to load form descriptors")?;

    for issue in state.descriptors.issues() {
        tracing::warn!(%issue, "descriptor list was repaired");
    }
    tracing::info!(
        fields = state.descriptors.len(),
        hidden_fields = ?state.schema.options().hidden_fields,
        "form schema ready"
    );

    let app = dform_api::app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("dform-api listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
    tracing::info!("shutting down");
}

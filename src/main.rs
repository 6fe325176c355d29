use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::info;

use ledger_api_errors::api::create_router;
use ledger_api_errors::app::{AppConfig, AppState};
use ledger_api_errors::infra::{init_metrics_handle, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);

    let metrics = init_metrics_handle();
    if metrics.is_none() {
        tracing::warn!("Prometheus recorder could not be installed; /metrics is disabled");
    }

    let addr = config.bind_addr;
    info!(
        %addr,
        timeout_secs = config.request_timeout.as_secs(),
        rate_limited = config.rate_limit.is_some(),
        auth_enabled = config.api_key.is_some(),
        "Starting API server"
    );

    let app_state = Arc::new(AppState::new(config, metrics));
    let router = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

//! Serve command implementation.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use console::style;
use tokio::sync::watch;
use tracing::info;

use qdash_dashboard::{AppState, DashboardConfig, create_router, run_poller};

/// Run the web dashboard until Ctrl-C.
pub async fn execute(config: DashboardConfig) -> Result<()> {
    let bind = config.bind_addr()?;
    let api_url = config.api.base_url.clone();
    let state = Arc::new(AppState::with_config(config)?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = tokio::spawn(run_poller(state.clone(), shutdown_rx));

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow!("Failed to bind {bind}: {e}"))?;

    println!(
        "{} Dashboard at {} (backend {})",
        style("→").cyan().bold(),
        style(format!("http://{bind}")).green(),
        style(&api_url).yellow()
    );
    info!("Starting qdash at http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("Shutting down");
    let _ = shutdown_tx.send(true);
    poller.await?;
    Ok(())
}

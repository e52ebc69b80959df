//! qdash-sim binary entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qdash_sim::{SimState, WorldConfig, create_router};

/// Simulated quantum backend for the qdash dashboard
#[derive(Parser)]
#[command(name = "qdash-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, env = "QDASH_SIM_BIND", default_value = "127.0.0.1:5000")]
    bind: SocketAddr,

    /// RNG seed for a reproducible job population
    #[arg(long, env = "QDASH_SIM_SEED")]
    seed: Option<u64>,

    /// Seconds between world ticks (0 disables time-based ticking)
    #[arg(long, default_value = "2")]
    tick_secs: u64,

    /// Jobs created at startup
    #[arg(long, default_value = "12")]
    initial_jobs: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qdash_sim=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = WorldConfig {
        seed: cli.seed,
        initial_jobs: cli.initial_jobs,
        ..WorldConfig::default()
    };
    let tick = (cli.tick_secs > 0).then(|| Duration::from_secs(cli.tick_secs));
    let state = Arc::new(SimState::new(config, tick));

    let app = create_router(state);

    tracing::info!("Starting qdash-sim at http://{}", cli.bind);
    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

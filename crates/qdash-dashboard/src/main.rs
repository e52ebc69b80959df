//! qdash command-line entry point.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use qdash_dashboard::{ConfigOverrides, DashboardConfig, logging};

mod commands;

use commands::{probe, serve, snapshot};

/// qdash - quantum job and backend status dashboard
#[derive(Parser)]
#[command(name = "qdash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and QDASH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web dashboard and poll the backend
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Seconds between refresh cycles
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Run one refresh cycle and print the result
    Snapshot {
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check connectivity to the backend
    Probe,
}

impl Cli {
    /// Loaded configuration with command-line overrides applied, validated once.
    fn config(&self) -> anyhow::Result<DashboardConfig> {
        let mut overrides = ConfigOverrides {
            api_url: self.api_url.clone(),
            ..ConfigOverrides::default()
        };
        if let Commands::Serve { bind, interval } = &self.command {
            overrides.bind_address = *bind;
            overrides.interval_secs = *interval;
        }
        let config = DashboardConfig::resolve(self.config.as_deref())?.apply(overrides);
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(2);
        }
    };

    logging::init(&config.logging, cli.verbose)?;

    let result = match cli.command {
        Commands::Serve { .. } => serve::execute(config).await,
        Commands::Snapshot { json } => snapshot::execute(config, json).await,
        Commands::Probe => probe::execute(config).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::LoggingConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable console output.
    Console,
    /// JSON structured logging.
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => LogFormat::Json,
            _ => LogFormat::Console,
        }
    }
}

/// Level after applying `-v` flags on top of the configured level.
pub fn effective_level(configured: &str, verbose: u8) -> &str {
    match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    }
}

/// Default filter directives for a level.
pub fn default_directives(level: &str) -> String {
    format!("qdash_dashboard={level},qdash_model={level},tower_http={level}")
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the config.
pub fn init(config: &LoggingConfig, verbose: u8) -> anyhow::Result<()> {
    let level = effective_level(&config.level, verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    // stdout is reserved for command output.
    let fmt_layer = match LogFormat::parse(&config.format) {
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        LogFormat::Console => fmt::layer().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

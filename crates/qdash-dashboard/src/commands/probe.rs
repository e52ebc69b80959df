//! Probe command implementation.

use anyhow::{Result, anyhow};
use console::style;

use qdash_dashboard::{Controller, DashboardConfig};

/// Call the backend's test endpoint and report connectivity.
pub async fn execute(config: DashboardConfig) -> Result<()> {
    let controller = Controller::from_config(&config)?;
    let url = controller.client().base_url().to_string();

    println!("{} Probing {}", style("→").cyan().bold(), style(&url).yellow());

    match controller.probe().await {
        Ok(probe) if probe.is_ok() => {
            println!("{} Backend reachable", style("✓").green().bold());
            if !probe.message.is_empty() {
                println!("  Message: {}", probe.message);
            }
            if let Some(version) = &probe.version {
                println!("  Version: {}", style(version).dim());
            }
            Ok(())
        }
        Ok(probe) => Err(anyhow!(
            "Backend at {url} answered with status '{}'",
            probe.status
        )),
        Err(e) => Err(anyhow!("Backend at {url} unreachable: {e}")),
    }
}

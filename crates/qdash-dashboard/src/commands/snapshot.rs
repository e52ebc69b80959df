//! Snapshot command implementation.

use anyhow::Result;

use qdash_dashboard::render::{RenderOptions, text};
use qdash_dashboard::{AppState, DashboardConfig};

/// Run one refresh cycle and print the view.
pub async fn execute(config: DashboardConfig, json: bool) -> Result<()> {
    let options = RenderOptions::from_config(&config);
    let state = AppState::with_config(config)?;
    let view = state.refresh().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", text::snapshot(&view, &options));
    }
    Ok(())
}

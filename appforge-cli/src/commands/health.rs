//! Health command handler

use anyhow::{Context, Result};
use colored::*;

use crate::config::Config;

/// Call the service health endpoint and print its answer
pub async fn handle_health(config: &Config) -> Result<()> {
    let client = config.client()?;

    let health = client
        .health()
        .await
        .with_context(|| format!("Service at {} is not reachable", client.base_url()))?;

    println!("{} {}", "✓".green(), client.base_url().bold());
    println!("  {}", health.message.dimmed());

    Ok(())
}

//! Download command handler

use anyhow::{Context, Result};
use appforge_client::GenerationClient;
use appforge_core::domain::job::JobId;
use colored::*;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Download the archive of a finished job
pub async fn handle_download(job_id: &str, output: Option<PathBuf>, config: &Config) -> Result<()> {
    let job_id = JobId::parse(job_id).context("Job ID cannot be empty")?;
    let output = output.unwrap_or_else(|| default_archive_path(&job_id));
    let client = config.client()?;

    save_archive(&client, &job_id, &output).await
}

/// Fetch the artifact of `job_id` and write it to `path`
pub async fn save_archive(client: &GenerationClient, job_id: &JobId, path: &Path) -> Result<()> {
    let archive = client.download_result(job_id).await.map_err(|e| {
        if e.is_not_found() {
            anyhow::anyhow!("Job {} not found or has no result yet", job_id)
        } else {
            anyhow::Error::new(e).context("Failed to download archive")
        }
    })?;

    tokio::fs::write(path, &archive)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Saved {} bytes to {}",
        "✓".green(),
        archive.len(),
        path.display().to_string().bold()
    );

    Ok(())
}

/// `<job-id>.zip` in the current directory
pub fn default_archive_path(job_id: &JobId) -> PathBuf {
    PathBuf::from(format!("{}.zip", job_id))
}

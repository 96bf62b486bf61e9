use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// POST a jobs fixture file to the seed endpoint of a running server.
pub async fn seed_jobs(file: &Path, server: &str) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let jobs: Value = serde_json::from_str(&raw).context("fixture is not valid JSON")?;
    if !jobs.is_array() {
        bail!("fixture must be a JSON array of jobs");
    }

    let url = format!("{}/api/v1/jobs/seed", server.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(&url)
        .json(&jobs)
        .send()
        .await
        .with_context(|| format!("failed to reach {}", url))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("seed failed: {} {}", status, body);
    }

    let body: Value = response.json().await.context("unexpected response body")?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    Ok(())
}

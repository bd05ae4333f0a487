// src/main.rs
//
// Small scan entrypoint: runs one audit against the configured service and
// prints the normalized report. Exercises the full fetch -> normalize ->
// persist path outside of tests.

use std::sync::Arc;

use seoreport::config::Config;
use seoreport::repository::MemoryReportStore;
use seoreport::service::{AuditClient, ReportService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: seoreport <url>"))?;

    let config = Config::from_env()?;
    let client = AuditClient::new(&config)?;
    let service = ReportService::new(client, Arc::new(MemoryReportStore::new()));

    let report = service.scan("local", &url).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

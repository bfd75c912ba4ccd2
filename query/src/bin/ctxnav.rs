use anyhow::Context as _;
use ctxnav_core::config::AppConfig;
use query::NavigationEngine;
use std::sync::Arc;
use storage::JsonFileStore;
use tokio::io::AsyncReadExt;
use tracing::info;

/// Answers one navigation request read from the file given as the first
/// argument, or from stdin, and prints the response as JSON.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ctxnav_core::init_tracing();

    let config = AppConfig::load().context("failed to load configuration")?;
    let store = JsonFileStore::open(&config.storage.contexts_path, &config.storage.links_path)
        .await
        .context("failed to open context store")?;
    let engine = NavigationEngine::from_store(Arc::new(store)).with_config(&config.navigation);

    let raw = match std::env::args().nth(1) {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read request from {path}"))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read request from stdin")?;
            buf
        }
    };

    let response = engine.execute_json(&raw).await;
    info!(success = response.success, "request answered");
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

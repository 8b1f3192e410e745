//! tidio-mcp binary: serves the Tidio bridge tools over stdio.

use anyhow::Context;
use tidio_core::TidioConfig;
use tidio_mcp::TidioService;
use tidio_store::CredentialStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the MCP transport; all logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = TidioConfig::default();
    let store = CredentialStore::new(&config);
    info!(credentials = %store.path().display(), "starting tidio-mcp on stdio");

    let service = rmcp::serve_server(TidioService::new(config, store), rmcp::transport::stdio())
        .await
        .context("failed to start MCP server on stdio")?;

    // Runs until the client disconnects (EOF on stdin).
    service.waiting().await?;
    Ok(())
}

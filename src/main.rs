use docsearch_mcp::{Config, DocSearchServer, IndexState};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load(std::env::args().nth(1))?;

    // Set up logging - write to stderr to avoid interfering with MCP protocol on stdout
    docsearch_mcp::tracing::init(config.log_json);

    tracing::info!("Starting docsearch-mcp MCP server");

    let state = Arc::new(IndexState::new(config));

    // A bad index path shouldn't stop the server; reload_index can fix it later
    if state.config().index_path.is_some()
        && let Err(e) = state.load(None).await
    {
        tracing::warn!("Starting without a search index: {:#}", e);
    }

    // Create and serve the MCP server over stdio
    let server = DocSearchServer::new(state);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    // Wait for the service to complete
    service.waiting().await?;

    Ok(())
}

//! Slack Lists MCP server
//!
//! Run with: `SLACK_BOT_TOKEN=xoxb-... slack-lists-server`
//! HTTP mode: `MCP_TRANSPORT=http PORT=8000 slack-lists-server`

use anyhow::Context;
use slack_lists_api::SlackListsClient;
use slack_lists_core::SystemClock;
use slack_lists_server::{
    DEFAULT_LOG_FILTER, McpServer, ServerConfig, Transport, run_stdio, serve_http,
};
use slack_lists_tools::{ListsToolContext, ToolRegistry, register_list_tools};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(?config, "Starting Slack Lists MCP server");

    let client = SlackListsClient::from_config(&config.client_config())
        .context("Failed to build Slack client")?;
    let context = ListsToolContext::new(Arc::new(client), Arc::new(SystemClock));

    let registry = ToolRegistry::new();
    register_list_tools(&registry, &context);
    tracing::info!(tools = ?registry.list_tools(), "Tools registered");

    let server = McpServer::new(registry);

    match config.transport {
        Transport::Stdio => run_stdio(&server).await?,
        Transport::Http => serve_http(Arc::new(server), &config.host, config.port).await?,
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

//! Sigil Node - README summarizing agent.
//!
//! Establishes the agent identity, then serves the HTTP API.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use sigil_github::ReadmeClient;
use sigil_node::api::{create_router, AppState};
use sigil_node::config::NodeArgs;
use sigil_node::context::AgentContext;
use sigil_node::observability::init_logging;
use sigil_node::summary::ExtractiveSummarizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = NodeArgs::parse().into_config()?;

    init_logging(&config.log_level, config.log_format());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Sigil node");
    tracing::info!(
        listen_addr = %config.listen_addr,
        key_path = %config.key_path.display(),
        github_api = %config.github_api,
        github_token = config.github_token.is_some(),
        "Node configuration"
    );

    // An agent with no usable identity must not serve traffic.
    let context = match AgentContext::initialize(&config) {
        Ok(context) => context,
        Err(e) => {
            tracing::error!(error = %e, "Failed to establish agent identity");
            return Err(e).context("identity initialization failed");
        }
    };

    let readmes = ReadmeClient::new(config.readme_client_config())
        .context("failed to build GitHub client")?;

    let state = AppState {
        context: Arc::new(context),
        readmes: Arc::new(readmes),
        summarizer: Arc::new(ExtractiveSummarizer::new(config.summary_max_chars)),
    };

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "Node is ready");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Node stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

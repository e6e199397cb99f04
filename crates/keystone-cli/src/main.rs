//! Keystone CLI
//!
//! Command-line front end and MCP server for generating project briefs and
//! task sets from uploaded planning documents.

mod args;
mod cli;
mod mcp;
mod progress;
mod renderer;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use keystone_core::{ApiClient, OrchestratorBuilder};
use log::info;
use mcp::{run_stdio_server, KeystoneMcpServer};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        api_url,
        no_color,
        command,
    } = Args::parse();

    let client = Arc::new(ApiClient::new(&api_url));
    let orchestrator = OrchestratorBuilder::new()
        .with_database_path(database_file)
        .with_generation_service(client.clone())
        .with_project_directory(client.clone())
        .build()
        .await
        .context("Failed to initialize keystone")?;

    info!("Keystone started against {}", client.base_url());

    let renderer = TerminalRenderer::new(!no_color);
    if let Some(Serve) = command {
        info!("Starting Keystone MCP server");
        return run_stdio_server(KeystoneMcpServer::new(orchestrator, client))
            .await
            .context("MCP server failed");
    }

    let cli = Cli::new(orchestrator, client, renderer);
    match command {
        Some(Generate(args)) => cli.generate(args).await,
        Some(Documents) => cli.documents().await,
        Some(Ledger { command }) => cli.handle_ledger_command(command).await,
        Some(Conversation { command }) => cli.handle_conversation_command(command).await,
        Some(Serve) | None => cli.show_ledger(),
    }
}

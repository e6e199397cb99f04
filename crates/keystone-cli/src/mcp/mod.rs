//! MCP server for Keystone
//!
//! Exposes generation and the generated-project ledger as Model Context
//! Protocol tools over stdio. One orchestrator is shared by all requests
//! behind a mutex, so runs never overlap.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use keystone_core::{ApiClient, Orchestrator};
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};

pub mod errors;
pub mod handlers;

pub use errors::to_mcp_error;
pub use handlers::{GenerationSelection, McpResult, PruneLedger};

const INSTRUCTIONS: &str = r#"Keystone turns uploaded planning documents into projects and task sets.

## Core Concepts
- **Documents**: files already uploaded to the backend, identified by filename
- **Project brief**: name, dates, budget and description extracted from a document; generating one also creates the project
- **Task sets**: tasks generated from a document for an existing project
- **Ledger**: which document generated which project

## Workflow
1. Call `list_documents` to see uploaded files and which already produced a project
2. Call `generate` with a filename and `generate_project_brief` and/or `generate_tasks` with `project_ids`
3. Steps run one at a time; if one fails the rest are skipped but earlier results are kept in the report
4. Call `prune_ledger` after deleting projects so stale associations disappear

`max_tasks_per_project` is clamped to 1..=20 and defaults to 5."#;

#[derive(Clone)]
pub struct KeystoneMcpServer {
    orchestrator: Arc<Mutex<Orchestrator>>,
    client: Arc<ApiClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl KeystoneMcpServer {
    pub fn new(orchestrator: Orchestrator, client: Arc<ApiClient>) -> Self {
        Self {
            orchestrator: Arc::new(Mutex::new(orchestrator)),
            client,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.orchestrator.clone(), self.client.clone())
    }

    #[tool(
        name = "generate",
        description = "Generate from an uploaded document. Set generate_project_brief to extract a project brief and create its project, and/or generate_tasks with project_ids to create task sets for existing projects. Steps run sequentially; on failure the remaining steps are skipped and the report shows the error next to whatever was already generated."
    )]
    async fn generate(&self, params: Parameters<GenerationSelection>) -> McpResult {
        self.handlers().generate(params).await
    }

    #[tool(
        name = "list_documents",
        description = "List uploaded documents. Documents that already generated a project are marked with the project's name."
    )]
    async fn list_documents(&self) -> McpResult {
        self.handlers().list_documents().await
    }

    #[tool(
        name = "show_ledger",
        description = "Show the generated-project ledger: each document filename with the project it produced."
    )]
    async fn show_ledger(&self) -> McpResult {
        self.handlers().show_ledger().await
    }

    #[tool(
        name = "prune_ledger",
        description = "Remove ledger records whose project no longer exists on the backend. Use dry_run=true to only report how many would be removed."
    )]
    async fn prune_ledger(&self, params: Parameters<PruneLedger>) -> McpResult {
        self.handlers().prune_ledger(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for KeystoneMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "keystone".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Serves MCP over stdio until the client disconnects or a signal arrives.
pub async fn run_stdio_server(server: KeystoneMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    debug!(
        "Serving {} tools against {}",
        server.tool_router.list_all().len(),
        server.client.base_url()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => match result {
            Ok(reason) => info!("MCP server stopped: {reason:?}"),
            Err(e) => error!("MCP server error: {e:?}"),
        },
        _ = sigint.recv() => info!("Received SIGINT, shutting down"),
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
    }

    Ok(())
}

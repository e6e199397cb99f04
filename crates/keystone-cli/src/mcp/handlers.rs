//! MCP tool handler implementations

use std::sync::Arc;

use keystone_core::{
    display::{DocumentEntries, LedgerEntries, OperationStatus},
    ledger, params as core,
    request::build_plan,
    ApiClient, DocumentDirectory, Orchestrator, OutcomeStatus, ProjectDirectory,
};
use log::debug;
use rmcp::{
    handler::server::tool::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::to_mcp_error;

/// Transparent MCP wrapper adding `JsonSchema` to a core parameter type.
///
/// Serde passes straight through to the wrapped value, so the tool schema
/// and the JSON accepted are exactly those of the core type.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type GenerationSelection = McpParams<core::GenerationSelection>;
pub type PruneLedger = McpParams<core::PruneLedger>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(markdown: impl Into<String>) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(markdown)]))
}

pub struct McpHandlers {
    orchestrator: Arc<Mutex<Orchestrator>>,
    client: Arc<ApiClient>,
}

impl McpHandlers {
    pub fn new(orchestrator: Arc<Mutex<Orchestrator>>, client: Arc<ApiClient>) -> Self {
        Self {
            orchestrator,
            client,
        }
    }

    /// Runs one generation to completion and returns the outcome report.
    ///
    /// A failed run is returned as a tool error carrying the full report, so
    /// partial results stay visible to the caller.
    pub async fn generate(
        &self,
        Parameters(params): Parameters<GenerationSelection>,
    ) -> McpResult {
        debug!("generate: {params:?}");

        let plan = build_plan(params.as_ref())
            .map_err(|e| to_mcp_error("Invalid generation request", &e))?;
        let projects = self
            .client
            .list_projects()
            .await
            .map_err(|e| to_mcp_error("Failed to list projects", &e))?;

        let mut orchestrator = self.orchestrator.lock().await;
        orchestrator
            .reconcile_ledger(&projects)
            .await
            .map_err(|e| to_mcp_error("Failed to reconcile ledger", &e))?;

        let outcome = orchestrator.run(plan, &projects).await;
        orchestrator
            .dismiss()
            .map_err(|e| to_mcp_error("Failed to reset run state", &e))?;

        let report = format!("{outcome}\n{}", OperationStatus::from(&outcome));
        match outcome.status() {
            OutcomeStatus::Succeeded => text(report),
            OutcomeStatus::PartiallyFailed | OutcomeStatus::Failed => {
                Ok(CallToolResult::error(vec![Content::text(report)]))
            }
        }
    }

    pub async fn list_documents(&self) -> McpResult {
        debug!("list_documents");

        let documents = self
            .client
            .list_documents()
            .await
            .map_err(|e| to_mcp_error("Failed to list documents", &e))?;
        let records = self.orchestrator.lock().await.ledger();
        let entries = DocumentEntries(ledger::annotate(&documents, &records));

        text(format!("# Documents\n\n{entries}"))
    }

    pub async fn show_ledger(&self) -> McpResult {
        debug!("show_ledger");

        let records = self.orchestrator.lock().await.ledger();
        text(format!(
            "# Generated Projects\n\n{}",
            LedgerEntries::from(&*records)
        ))
    }

    pub async fn prune_ledger(&self, Parameters(params): Parameters<PruneLedger>) -> McpResult {
        debug!("prune_ledger: {params:?}");

        let projects = self
            .client
            .list_projects()
            .await
            .map_err(|e| to_mcp_error("Failed to list projects", &e))?;

        let mut orchestrator = self.orchestrator.lock().await;
        let current = orchestrator.ledger();
        let kept = ledger::prune(&current, &projects);
        let removed = current.len() - kept.len();

        if params.as_ref().dry_run {
            return text(
                OperationStatus::success(format!("Would remove {removed} stale record(s)"))
                    .to_string(),
            );
        }

        orchestrator
            .reconcile_ledger(&projects)
            .await
            .map_err(|e| to_mcp_error("Failed to prune ledger", &e))?;
        text(format!(
            "{}\n{}",
            OperationStatus::success(format!("Removed {removed} stale record(s)")),
            LedgerEntries::from(&*kept)
        ))
    }
}

//! Command definitions and their handlers.
//!
//! Clap argument structs stay in this crate and convert into the
//! interface-agnostic parameter types of `keystone_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → request::build_plan → Orchestrator
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use keystone_core::{
    display::{DocumentEntries, LedgerEntries, OperationStatus},
    ledger,
    params::{GenerationSelection, PruneLedger},
    request::{build_plan, DEFAULT_TASKS_PER_PROJECT},
    ApiClient, DocumentDirectory, Orchestrator, OutcomeStatus, ProjectDirectory,
};
use log::debug;

use crate::{progress::ProgressPrinter, renderer::TerminalRenderer};

/// Generate a project brief and/or task sets from a document
#[derive(Args)]
pub struct GenerateArgs {
    /// Filename of the uploaded source document
    pub filename: String,
    /// Generate a project brief and create its project
    #[arg(short, long)]
    pub brief: bool,
    /// Generate task sets for the projects given with --project
    #[arg(short, long)]
    pub tasks: bool,
    /// Target project id for task generation (repeatable)
    #[arg(short, long = "project", value_name = "ID")]
    pub projects: Vec<u64>,
    /// Upper bound on tasks per project; values outside 1..=20 are clamped
    #[arg(short, long, value_name = "N", default_value_t = i64::from(DEFAULT_TASKS_PER_PROJECT), allow_negative_numbers = true)]
    pub max_tasks: i64,
}

impl From<GenerateArgs> for GenerationSelection {
    fn from(val: GenerateArgs) -> Self {
        GenerationSelection {
            filename: Some(val.filename),
            generate_project_brief: val.brief,
            generate_tasks: val.tasks,
            project_ids: val.projects,
            max_tasks_per_project: Some(val.max_tasks),
        }
    }
}

/// Drop ledger records whose project no longer exists
#[derive(Args)]
pub struct PruneLedgerArgs {
    /// Only report what would be removed
    #[arg(long)]
    pub dry_run: bool,
}

impl From<PruneLedgerArgs> for PruneLedger {
    fn from(val: PruneLedgerArgs) -> Self {
        PruneLedger {
            dry_run: val.dry_run,
        }
    }
}

#[derive(Subcommand)]
pub enum LedgerCommands {
    /// Show which documents generated which projects
    #[command(alias = "s")]
    Show,
    /// Drop records whose project was deleted
    #[command(alias = "p")]
    Prune(PruneLedgerArgs),
    /// Forget every record
    Clear,
}

#[derive(Subcommand)]
pub enum ConversationCommands {
    /// Print the active conversation id
    Show,
    /// Set the active conversation id
    Set {
        /// Conversation identifier
        id: String,
    },
    /// Clear the active conversation id
    Clear,
}

/// Command handlers bound to one orchestrator and backend client.
pub struct Cli {
    orchestrator: Orchestrator,
    client: Arc<ApiClient>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(orchestrator: Orchestrator, client: Arc<ApiClient>, renderer: TerminalRenderer) -> Self {
        Self {
            orchestrator,
            client,
            renderer,
        }
    }

    /// Validates the selection, reconciles the ledger and runs the plan while
    /// printing progress.
    pub async fn generate(mut self, args: GenerateArgs) -> Result<()> {
        let plan = build_plan(&args.into()).context("Invalid generation request")?;

        let projects = self
            .client
            .list_projects()
            .await
            .context("Failed to list projects")?;
        if self.orchestrator.reconcile_ledger(&projects).await? {
            debug!("ledger reconciled before run");
        }

        let mut printer = ProgressPrinter::new(&self.renderer);
        let mut state = self.orchestrator.subscribe();
        let mut lines = self.orchestrator.feed().subscribe();

        let outcome = {
            let run = self.orchestrator.run(plan, &projects);
            tokio::pin!(run);
            loop {
                tokio::select! {
                    outcome = &mut run => break outcome,
                    Ok(()) = state.changed() => printer.steps(&state.borrow_and_update().steps)?,
                    Ok(()) = lines.changed() => printer.lines(&lines.borrow_and_update())?,
                }
            }
        };
        printer.steps(&self.orchestrator.state().steps)?;

        // Replay whatever the last step queued before reporting.
        while self.orchestrator.feed().queued_lines() > 0 && lines.changed().await.is_ok() {
            printer.lines(&lines.borrow_and_update())?;
        }

        self.renderer.render(&format!("\n{outcome}"))?;
        let status = OperationStatus::from(&outcome);
        self.orchestrator.dismiss()?;

        match outcome.status() {
            OutcomeStatus::Succeeded => self.renderer.render(&status.to_string()),
            OutcomeStatus::PartiallyFailed | OutcomeStatus::Failed => {
                anyhow::bail!("{}", status.message())
            }
        }
    }

    pub async fn documents(mut self) -> Result<()> {
        let documents = self
            .client
            .list_documents()
            .await
            .context("Failed to list documents")?;
        if let Ok(projects) = self.client.list_projects().await {
            self.orchestrator.reconcile_ledger(&projects).await?;
        }

        let entries = ledger::annotate(&documents, &self.orchestrator.ledger());
        self.renderer
            .render(&DocumentEntries(entries).to_string())
    }

    pub async fn handle_ledger_command(mut self, command: LedgerCommands) -> Result<()> {
        match command {
            LedgerCommands::Show => self.show_ledger(),
            LedgerCommands::Prune(args) => self.prune_ledger(&args.into()).await,
            LedgerCommands::Clear => {
                let removed = self.orchestrator.session().clear_ledger().await?;
                let message = if removed {
                    "Generated-project ledger cleared"
                } else {
                    "Generated-project ledger was already empty"
                };
                self.renderer
                    .render(&OperationStatus::success(message).to_string())
            }
        }
    }

    pub fn show_ledger(&self) -> Result<()> {
        let entries = LedgerEntries::from(&*self.orchestrator.ledger());
        self.renderer.render(&entries.to_string())
    }

    async fn prune_ledger(&mut self, params: &PruneLedger) -> Result<()> {
        let projects = self
            .client
            .list_projects()
            .await
            .context("Failed to list projects")?;

        let current = self.orchestrator.ledger();
        let pruned = ledger::prune(&current, &projects);
        let dropped: Vec<_> = current
            .iter()
            .filter(|record| !pruned.contains(record))
            .cloned()
            .collect();

        if dropped.is_empty() {
            return self
                .renderer
                .render(&OperationStatus::success("No stale ledger records").to_string());
        }

        let verb = if params.dry_run {
            "Would remove"
        } else {
            self.orchestrator.reconcile_ledger(&projects).await?;
            "Removed"
        };
        self.renderer.render(&format!(
            "{}{}",
            OperationStatus::success(format!("{verb} {} stale record(s)", dropped.len())),
            LedgerEntries(dropped)
        ))
    }

    pub async fn handle_conversation_command(self, command: ConversationCommands) -> Result<()> {
        let session = self.orchestrator.session();
        match command {
            ConversationCommands::Show => {
                let message = match session.active_conversation().await? {
                    Some(id) => format!("Active conversation: {id}\n"),
                    None => "No active conversation.\n".to_string(),
                };
                self.renderer.render(&message)
            }
            ConversationCommands::Set { id } => {
                session.set_active_conversation(&id).await?;
                self.renderer.render(
                    &OperationStatus::success(format!("Active conversation set to {}", id.trim()))
                        .to_string(),
                )
            }
            ConversationCommands::Clear => {
                session.clear_active_conversation().await?;
                self.renderer
                    .render(&OperationStatus::success("Active conversation cleared").to_string())
            }
        }
    }
}

//! Generation run orchestration.
//!
//! The [`Orchestrator`] is the single owner of a run's mutable state: the
//! step list, the thinking feed and the generated-project ledger. It drives
//! the external services strictly sequentially and publishes every state
//! change over `watch` channels, so any UI layer (or a test) can observe a
//! run without sharing ownership of it.
//!
//! ```text
//! ┌────────────────┐   plan    ┌────────────────┐   calls   ┌────────────────┐
//! │    request     │──────────▶│  Orchestrator  │──────────▶│   services     │
//! │ (build_plan)   │           │  (run.rs)      │           │ (service.rs)   │
//! └────────────────┘           └───────┬────────┘           └────────────────┘
//!                                      │ watch
//!                         ┌────────────┼────────────┐
//!                         ▼            ▼            ▼
//!                      RunState   ThinkingFeed   LedgerRecords
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: wiring services, store and timings into an [`Orchestrator`]
//! - `run`: the step sequence of one generation run
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use keystone_core::{
//!     client::ApiClient, params::GenerationSelection, request::build_plan, OrchestratorBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(ApiClient::new("http://localhost:8000"));
//! let mut orchestrator = OrchestratorBuilder::new()
//!     .with_generation_service(client.clone())
//!     .with_project_directory(client.clone())
//!     .build()
//!     .await?;
//!
//! let plan = build_plan(&GenerationSelection {
//!     filename: Some("Plan.pdf".to_string()),
//!     generate_project_brief: true,
//!     ..Default::default()
//! })?;
//! let outcome = orchestrator.run(plan, &[]).await;
//! println!("{:?}", outcome.summary_message);
//! orchestrator.dismiss()?;
//! # Ok(())
//! # }
//! ```

use std::{sync::Arc, time::Duration};

use log::{debug, warn};
use tokio::sync::watch;

pub mod builder;
mod run;

#[cfg(test)]
mod tests;

pub use builder::OrchestratorBuilder;

use crate::{
    error::{GenerationError, Result},
    feed::ThinkingFeed,
    ledger::{self, LedgerRecords},
    models::{Project, RunState},
    service::{GenerationService, ProjectDirectory},
    store::SessionStore,
};

/// Single-owner driver of generation runs.
pub struct Orchestrator {
    pub(crate) generation: Arc<dyn GenerationService>,
    pub(crate) projects: Arc<dyn ProjectDirectory>,
    pub(crate) session: SessionStore,
    pub(crate) feed: ThinkingFeed,
    pub(crate) feed_spacing: Duration,
    pub(crate) state: watch::Sender<RunState>,
    pub(crate) ledger: watch::Sender<LedgerRecords>,
}

impl Orchestrator {
    pub(crate) fn new(
        generation: Arc<dyn GenerationService>,
        projects: Arc<dyn ProjectDirectory>,
        session: SessionStore,
        feed: ThinkingFeed,
        feed_spacing: Duration,
        ledger: LedgerRecords,
    ) -> Self {
        let (state, _) = watch::channel(RunState::default());
        let (ledger, _) = watch::channel(ledger);
        Self {
            generation,
            projects,
            session,
            feed,
            feed_spacing,
            state,
            ledger,
        }
    }

    /// Snapshot of the current run.
    pub fn state(&self) -> RunState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every step transition and terminal change.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    pub fn feed(&self) -> &ThinkingFeed {
        &self.feed
    }

    /// Current ledger snapshot.
    pub fn ledger(&self) -> LedgerRecords {
        Arc::clone(&self.ledger.borrow())
    }

    /// Receiver notified whenever the ledger snapshot is replaced.
    pub fn subscribe_ledger(&self) -> watch::Receiver<LedgerRecords> {
        self.ledger.subscribe()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Closes the progress view of a finished run.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::RunInProgress` while a run is active.
    pub fn dismiss(&mut self) -> Result<()> {
        if !self.state.borrow().is_dismissible() {
            return Err(GenerationError::RunInProgress);
        }
        self.feed.clear();
        self.state.send_replace(RunState::default());
        debug!("run dismissed");
        Ok(())
    }

    /// Drops ledger records whose project no longer exists and persists the
    /// result when anything changed.
    ///
    /// Returns whether the ledger changed.
    pub async fn reconcile_ledger(&mut self, live_projects: &[Project]) -> Result<bool> {
        let current = self.ledger();
        let pruned = ledger::prune(&current, live_projects);
        if Arc::ptr_eq(&current, &pruned) {
            return Ok(false);
        }

        self.session.save_ledger(&pruned).await?;
        self.ledger.send_replace(pruned);
        Ok(true)
    }

    /// Replaces the ledger snapshot and persists it.
    ///
    /// A failed write is logged and otherwise ignored; the in-memory snapshot
    /// stays authoritative for the rest of the session.
    pub(crate) async fn commit_ledger(&mut self, next: LedgerRecords) {
        if Arc::ptr_eq(&self.ledger.borrow(), &next) {
            return;
        }
        if let Err(e) = self.session.save_ledger(&next).await {
            warn!("failed to persist generated-project ledger: {e}");
        }
        self.ledger.send_replace(next);
    }
}

//! Core library for the Keystone document-to-project generator.
//!
//! Keystone turns an uploaded planning document into a project brief (and the
//! project it describes) and into task sets for existing projects. This crate
//! holds everything below the user interface:
//!
//! - [`request`]: validation of a user selection into a [`GenerationPlan`]
//! - [`orchestrator`]: the sequential run over the external services, with
//!   partial-failure handling
//! - [`progress`]: the per-run step state machine
//! - [`feed`]: the self-expiring "thinking" lines shown during a run
//! - [`ledger`]: which document produced which project, reconciled against
//!   the live project list
//! - [`store`] and [`db`]: the local key-value store backing the ledger
//! - [`service`] and [`client`]: the external collaborators and their HTTP
//!   implementation
//!
//! # Display Architecture
//!
//! Models implement [`std::fmt::Display`] in [`display::models`] and the
//! [`display`] wrappers add collection and status formatting. All output is
//! markdown, rendered by the CLI's terminal renderer or returned verbatim over
//! MCP.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use keystone_core::{
//!     client::ApiClient, params::GenerationSelection, request::build_plan, OrchestratorBuilder,
//!     ProjectDirectory,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(ApiClient::new("http://localhost:8000"));
//! let mut orchestrator = OrchestratorBuilder::new()
//!     .with_database_path(Some("keystone.db"))
//!     .with_generation_service(client.clone())
//!     .with_project_directory(client.clone())
//!     .build()
//!     .await?;
//!
//! let plan = build_plan(&GenerationSelection {
//!     filename: Some("Plan.pdf".to_string()),
//!     generate_tasks: true,
//!     project_ids: vec![7],
//!     max_tasks_per_project: Some(8),
//!     ..Default::default()
//! })?;
//!
//! let projects = client.list_projects().await?;
//! orchestrator.reconcile_ledger(&projects).await?;
//! let outcome = orchestrator.run(plan, &projects).await;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod db;
pub mod display;
pub mod error;
pub mod feed;
pub mod ledger;
pub mod models;
pub mod orchestrator;
pub mod params;
pub mod progress;
pub mod request;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use client::ApiClient;
pub use db::Database;
pub use display::{
    DocumentEntries, LedgerEntries, LocalDateTime, LocalTime, OperationStatus, Steps,
};
pub use error::{GenerationError, Result};
pub use feed::ThinkingFeed;
pub use ledger::LedgerRecords;
pub use models::{
    Document, DocumentEntry, GeneratedProjectRecord, GenerationOutcome, GenerationPlan,
    OutcomeStatus, ProgressStep, Project, ProjectId, RunState, StepId, StepStatus, TaskGroup,
};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use params::{GenerationSelection, PruneLedger};
pub use service::{DocumentDirectory, GenerationService, ProjectDirectory};
pub use store::{KeyValueStore, MemoryStore, SessionStore, SqliteStore};

//! Data models for generation runs.
//!
//! This module contains the domain models of the keystone generation flow.
//! Display implementations for these models live in
//! [`crate::display::models`] to keep data structures separate from
//! presentation.
//!
//! ## Model Overview
//!
//! - [`GenerationPlan`]: validated description of one run
//! - [`ProgressStep`]: one visible unit of progress, keyed by [`StepId`]
//! - [`ThinkingLine`]: ephemeral feed line
//! - [`GeneratedProjectRecord`]: ledger entry tying a document to a project
//! - [`GenerationOutcome`]: what a run produced, including partial results
//! - [`RunState`]: the snapshot a UI renders while a run is active
//!
//! Backend-facing shapes ([`Project`], [`ProjectBrief`], [`GeneratedTask`],
//! [`Document`]) mirror the REST payloads.
//!
//! # Examples
//!
//! ```rust
//! use keystone_core::models::{ProgressStep, StepId, StepStatus};
//!
//! let step = ProgressStep::new(StepId::Tasks(7), "Tasks for Tower", StepStatus::Pending);
//! assert_eq!(step.id.to_string(), "tasks-7");
//! assert!(step.status.can_transition_to(StepStatus::InProgress));
//! ```

pub mod outcome;
pub mod plan;
pub mod project;
pub mod record;
pub mod status;
pub mod step;
pub mod thinking;


/// Backend identifier of a project.
pub type ProjectId = u64;

pub use outcome::{GenerationOutcome, OutcomeStatus, RunState, TaskGroup};
pub use plan::GenerationPlan;
pub use project::{
    Document, DocumentEntry, GeneratedTask, NewProject, Project, ProjectBrief, ProjectRef,
};
pub use record::GeneratedProjectRecord;
pub use status::StepStatus;
pub use step::{ProgressStep, StepId};
pub use thinking::ThinkingLine;

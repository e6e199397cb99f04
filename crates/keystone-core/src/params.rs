//! Parameter structures for keystone operations
//!
//! These structures carry raw user input across interfaces (CLI, MCP) without
//! framework-specific derives. Interface layers wrap them: the CLI converts its
//! clap `Args` structs into these types, and the MCP server deserializes them
//! through a transparent wrapper that adds `JsonSchema`.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Validation does not happen here: [`crate::request::build_plan`] turns a
//! [`GenerationSelection`] into a [`crate::models::GenerationPlan`].

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What the user picked in the "generate from document" form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GenerationSelection {
    /// Filename of the source document
    pub filename: Option<String>,
    /// Generate a project brief (creating its project)
    #[serde(default)]
    pub generate_project_brief: bool,
    /// Generate task sets for the selected projects
    #[serde(default)]
    pub generate_tasks: bool,
    /// Projects to generate tasks for, in order
    #[serde(default)]
    pub project_ids: Vec<u64>,
    /// Maximum tasks per project; clamped into 1..=20, defaults to 5
    pub max_tasks_per_project: Option<i64>,
}

/// Parameters for reconciling the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PruneLedger {
    /// Report what would be removed without writing
    #[serde(default)]
    pub dry_run: bool,
}

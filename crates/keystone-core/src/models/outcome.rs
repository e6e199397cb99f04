//! Run outcome and UI-facing run state.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{GeneratedTask, ProgressStep, ProjectBrief, ProjectId, ProjectRef};

/// Tasks generated for one target project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskGroup {
    pub project_id: ProjectId,
    /// Name frozen when the run was built
    pub project_name: String,
    pub tasks: Vec<GeneratedTask>,
}

/// Result of one orchestrated run.
///
/// Partial results are kept when a later step fails, so an outcome can carry
/// both an `error` and a brief or completed task groups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationOutcome {
    pub brief: Option<ProjectBrief>,
    pub created_project: Option<ProjectRef>,
    pub task_groups: Vec<TaskGroup>,
    pub error: Option<String>,
    pub summary_message: Option<String>,
    pub finished_at: Timestamp,
}

/// Classification of an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
    /// Failed after at least one step produced results
    PartiallyFailed,
}

impl GenerationOutcome {
    pub(crate) fn empty() -> Self {
        Self {
            brief: None,
            created_project: None,
            task_groups: Vec::new(),
            error: None,
            summary_message: None,
            finished_at: Timestamp::now(),
        }
    }

    /// Whether any step produced a result.
    pub fn has_results(&self) -> bool {
        self.brief.is_some() || !self.task_groups.is_empty()
    }

    pub fn status(&self) -> OutcomeStatus {
        match (&self.error, self.has_results()) {
            (None, _) => OutcomeStatus::Succeeded,
            (Some(_), true) => OutcomeStatus::PartiallyFailed,
            (Some(_), false) => OutcomeStatus::Failed,
        }
    }

    /// Total number of generated tasks across all groups.
    pub fn task_count(&self) -> usize {
        self.task_groups.iter().map(|group| group.tasks.len()).sum()
    }
}

/// Snapshot of the current run published to the UI layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunState {
    pub steps: Vec<ProgressStep>,
    /// A run has started and not finished
    pub running: bool,
    /// The run finished, successfully or not, and can be dismissed
    pub terminal: bool,
    pub error: Option<String>,
    pub success_message: Option<String>,
}

impl RunState {
    /// Whether the progress view may be dismissed.
    pub fn is_dismissible(&self) -> bool {
        !self.running
    }
}

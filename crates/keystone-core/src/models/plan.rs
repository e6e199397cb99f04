//! Generation plan model.

use serde::{Deserialize, Serialize};

use super::ProjectId;

/// Validated description of one generation run.
///
/// Only [`crate::request::build_plan`] produces plans, so every instance holds
/// the invariants: at least one generate flag is set, task generation has at
/// least one target project, and `max_tasks_per_project` is within
/// [`crate::request::MIN_TASKS_PER_PROJECT`]..=[`crate::request::MAX_TASKS_PER_PROJECT`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationPlan {
    /// Filename of the uploaded source document
    pub source_filename: String,

    /// Whether to generate a project brief (and its project)
    pub generate_project_brief: bool,

    /// Whether to generate task sets for the target projects
    pub generate_tasks: bool,

    /// Target projects for task generation, in selection order, no duplicates
    pub target_project_ids: Vec<ProjectId>,

    /// Upper bound on tasks generated per project
    pub max_tasks_per_project: u8,
}

impl GenerationPlan {
    /// Number of external calls the plan will make.
    pub fn call_count(&self) -> usize {
        let brief = usize::from(self.generate_project_brief);
        let tasks = if self.generate_tasks {
            self.target_project_ids.len()
        } else {
            0
        };
        brief + tasks
    }
}

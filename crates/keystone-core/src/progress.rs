//! Progress state machine for one generation run.
//!
//! Steps are plain data and every operation returns a new list, so the
//! orchestrator can publish each snapshot to the UI as-is.

use log::debug;

use crate::models::{GenerationPlan, ProgressStep, Project, ProjectId, StepId, StepStatus};

/// Builds the ordered step list for a plan.
///
/// Order is fixed: context (already in progress), then the project step when a
/// brief is requested, then one step per target project in plan order. Project
/// names are resolved here and frozen for the rest of the run.
pub fn init_steps(plan: &GenerationPlan, projects: &[Project]) -> Vec<ProgressStep> {
    let mut steps = vec![ProgressStep::new(
        StepId::Context,
        "Preparing document context",
        StepStatus::InProgress,
    )];

    if plan.generate_project_brief {
        steps.push(ProgressStep::new(
            StepId::Project,
            "Generating project brief",
            StepStatus::Pending,
        ));
    }

    if plan.generate_tasks {
        steps.extend(plan.target_project_ids.iter().map(|&id| {
            ProgressStep::new(
                StepId::Tasks(id),
                format!("Generating tasks for {}", project_name(projects, id)),
                StepStatus::Pending,
            )
        }));
    }

    steps
}

/// Resolves a project's display name, falling back to its id.
pub fn project_name(projects: &[Project], id: ProjectId) -> String {
    projects
        .iter()
        .find(|project| project.id == id)
        .map(|project| project.name.clone())
        .unwrap_or_else(|| format!("Project #{id}"))
}

/// Moves one step to `status` if the move is forward.
///
/// Backward moves, moves out of a terminal status and unknown ids leave the
/// list unchanged; in particular, applying error to a completed step is a
/// no-op.
pub fn transition(steps: &[ProgressStep], id: StepId, status: StepStatus) -> Vec<ProgressStep> {
    steps
        .iter()
        .map(|step| {
            if step.id == id && step.status.can_transition_to(status) {
                debug!("step {} {} -> {}", step.id, step.status, status);
                ProgressStep {
                    status,
                    ..step.clone()
                }
            } else {
                step.clone()
            }
        })
        .collect()
}

/// Marks every in-progress step as failed.
///
/// Completed steps keep their status and pending steps stay pending: work that
/// already committed is never rolled back.
pub fn fail_in_progress(steps: &[ProgressStep]) -> Vec<ProgressStep> {
    steps
        .iter()
        .map(|step| match step.status {
            StepStatus::InProgress => ProgressStep {
                status: StepStatus::Error,
                ..step.clone()
            },
            _ => step.clone(),
        })
        .collect()
}

/// Returns `(completed, total)` for a progress header.
pub fn progress_counts(steps: &[ProgressStep]) -> (usize, usize) {
    let completed = steps
        .iter()
        .filter(|step| step.status == StepStatus::Completed)
        .count();
    (completed, steps.len())
}

/// Looks up the status of a step.
pub fn status_of(steps: &[ProgressStep], id: StepId) -> Option<StepStatus> {
    steps.iter().find(|step| step.id == id).map(|step| step.status)
}

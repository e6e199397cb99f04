//! Turns a user selection into a validated [`GenerationPlan`].

use crate::{
    error::{GenerationError, Result},
    models::{GenerationPlan, ProjectId},
    params::GenerationSelection,
};

/// Lower bound for tasks generated per project.
pub const MIN_TASKS_PER_PROJECT: u8 = 1;
/// Upper bound for tasks generated per project.
pub const MAX_TASKS_PER_PROJECT: u8 = 20;
/// Used when the selection leaves the limit unset.
pub const DEFAULT_TASKS_PER_PROJECT: u8 = 5;

/// Clamps a requested task limit into the supported range.
///
/// Out-of-range values are clamped rather than rejected. Clamping is
/// idempotent.
///
/// ```rust
/// use keystone_core::request::clamp_max_tasks;
///
/// assert_eq!(clamp_max_tasks(0), 1);
/// assert_eq!(clamp_max_tasks(7), 7);
/// assert_eq!(clamp_max_tasks(500), 20);
/// ```
pub fn clamp_max_tasks(requested: i64) -> u8 {
    let clamped = requested.clamp(
        i64::from(MIN_TASKS_PER_PROJECT),
        i64::from(MAX_TASKS_PER_PROJECT),
    );
    // In range after clamping, so the conversion cannot fail.
    u8::try_from(clamped).unwrap_or(MAX_TASKS_PER_PROJECT)
}

/// Validates a selection and builds the plan for one run.
///
/// # Errors
///
/// Returns `GenerationError::Validation` when no document is selected, when
/// neither generate option is set, or when tasks are requested without any
/// target project.
pub fn build_plan(selection: &GenerationSelection) -> Result<GenerationPlan> {
    let filename = selection
        .filename
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            GenerationError::validation("filename").with_reason("Select a document to generate from")
        })?;

    if !selection.generate_project_brief && !selection.generate_tasks {
        return Err(GenerationError::validation("options")
            .with_reason("Choose at least one option to generate"));
    }

    let target_project_ids = if selection.generate_tasks {
        let ids = dedup_in_order(&selection.project_ids);
        if ids.is_empty() {
            return Err(GenerationError::validation("project_ids")
                .with_reason("Select at least one project to generate tasks for"));
        }
        ids
    } else {
        Vec::new()
    };

    let max_tasks_per_project = selection
        .max_tasks_per_project
        .map_or(DEFAULT_TASKS_PER_PROJECT, clamp_max_tasks);

    Ok(GenerationPlan {
        source_filename: filename.to_string(),
        generate_project_brief: selection.generate_project_brief,
        generate_tasks: selection.generate_tasks,
        target_project_ids,
        max_tasks_per_project,
    })
}

fn dedup_in_order(ids: &[ProjectId]) -> Vec<ProjectId> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

//! The step sequence of one generation run.

use jiff::Timestamp;
use log::{debug, info, warn};

use super::Orchestrator;
use crate::{
    error::Result,
    feed::{brief_fallback, extract_snippets, tasks_fallback, MAX_SNIPPETS},
    ledger,
    models::{
        GenerationOutcome, GenerationPlan, NewProject, Project, ProjectId, ProjectRef, RunState,
        StepId, StepStatus, TaskGroup,
    },
    progress,
    service::TaskOptions,
};

impl Orchestrator {
    /// Executes `plan` and returns what it produced.
    ///
    /// `projects` is the live project list used to name task steps; names are
    /// frozen for the duration of the run. Service failures never escape:
    /// they end the run with `outcome.error` set, every in-progress step
    /// marked as error and all results collected so far retained.
    pub async fn run(&mut self, plan: GenerationPlan, projects: &[Project]) -> GenerationOutcome {
        info!(
            "starting generation run for '{}' ({} service call(s))",
            plan.source_filename,
            plan.call_count()
        );

        self.feed.clear();
        self.state.send_replace(RunState {
            steps: progress::init_steps(&plan, projects),
            running: true,
            ..RunState::default()
        });

        let mut outcome = GenerationOutcome::empty();
        match self.execute(&plan, projects, &mut outcome).await {
            Ok(()) => {
                let summary = summary_message(&outcome);
                info!("generation run finished: {summary}");
                self.state.send_modify(|state| {
                    state.running = false;
                    state.terminal = true;
                    state.success_message = Some(summary.clone());
                });
                outcome.summary_message = Some(summary);
            }
            Err(e) => {
                let message = e.user_message();
                warn!("generation run failed: {e}");
                self.state.send_modify(|state| {
                    state.steps = progress::fail_in_progress(&state.steps);
                    state.running = false;
                    state.terminal = true;
                    state.error = Some(message.clone());
                });
                outcome.error = Some(message);
            }
        }

        outcome.finished_at = Timestamp::now();
        outcome
    }

    async fn execute(
        &mut self,
        plan: &GenerationPlan,
        projects: &[Project],
        outcome: &mut GenerationOutcome,
    ) -> Result<()> {
        // Context is local setup only.
        self.set_status(StepId::Context, StepStatus::Completed);

        if plan.generate_project_brief {
            self.generate_brief(plan, outcome).await?;
        }

        if plan.generate_tasks {
            for &project_id in &plan.target_project_ids {
                self.generate_tasks(plan, project_id, projects, outcome)
                    .await?;
            }
        }

        Ok(())
    }

    async fn generate_brief(
        &mut self,
        plan: &GenerationPlan,
        outcome: &mut GenerationOutcome,
    ) -> Result<()> {
        self.set_status(StepId::Project, StepStatus::InProgress);

        let response = self
            .generation
            .generate_project_brief(&plan.source_filename, true)
            .await?;
        outcome.brief = Some(response.brief.clone());

        // A successful brief step always leaves a usable project behind.
        let project = match response.created_project {
            Some(project) if response.persisted => project,
            _ => {
                debug!(
                    "brief for '{}' was not persisted, creating project '{}'",
                    plan.source_filename, response.brief.name
                );
                self.projects
                    .create_project(&NewProject::from(&response.brief))
                    .await?
            }
        };

        self.set_status(StepId::Project, StepStatus::Completed);
        outcome.created_project = Some(ProjectRef::from(&project));

        let next = ledger::upsert(
            &self.ledger(),
            &plan.source_filename,
            Some(Some(project.id)),
            Some(Some(project.name.clone())),
        );
        self.commit_ledger(next).await;

        let lines = response
            .raw_response
            .as_deref()
            .map(|raw| extract_snippets(raw, MAX_SNIPPETS))
            .filter(|snippets| !snippets.is_empty())
            .unwrap_or_else(brief_fallback);
        self.feed.enqueue_sequence(lines, self.feed_spacing);

        Ok(())
    }

    async fn generate_tasks(
        &mut self,
        plan: &GenerationPlan,
        project_id: ProjectId,
        projects: &[Project],
        outcome: &mut GenerationOutcome,
    ) -> Result<()> {
        let step = StepId::Tasks(project_id);
        self.set_status(step, StepStatus::InProgress);

        let options = TaskOptions {
            max_tasks: plan.max_tasks_per_project,
            persist: true,
        };
        let response = self
            .generation
            .generate_tasks_from_document(&plan.source_filename, project_id, options)
            .await?;

        let project_name = progress::project_name(projects, project_id);
        debug!(
            "received {} task(s) for project {project_id}",
            response.tasks.len()
        );

        let mut lines = response.thinking_lines();
        if lines.is_empty() {
            lines = response
                .raw_response
                .as_deref()
                .map(|raw| extract_snippets(raw, MAX_SNIPPETS))
                .unwrap_or_default();
        }
        if lines.is_empty() {
            lines = tasks_fallback(&project_name);
        }

        outcome.task_groups.push(TaskGroup {
            project_id,
            project_name,
            tasks: response.tasks,
        });
        self.set_status(step, StepStatus::Completed);
        self.feed.enqueue_sequence(lines, self.feed_spacing);

        Ok(())
    }

    fn set_status(&self, id: StepId, status: StepStatus) {
        self.state.send_modify(|state| {
            if let Some(from) = progress::status_of(&state.steps, id) {
                debug!("step {id}: {from} -> {status}");
            }
            state.steps = progress::transition(&state.steps, id, status);
        });
    }
}

/// Describes what a fully successful run produced.
///
/// ```text
/// brief only          -> "Successfully generated project brief."
/// brief and 2 sets    -> "Successfully generated project brief and 2 task sets."
/// ```
pub(crate) fn summary_message(outcome: &GenerationOutcome) -> String {
    let mut parts = Vec::new();
    if outcome.brief.is_some() {
        parts.push("project brief".to_string());
    }
    match outcome.task_groups.len() {
        0 => {}
        1 => parts.push("1 task set".to_string()),
        n => parts.push(format!("{n} task sets")),
    }

    if parts.is_empty() {
        "Generation finished with nothing to report.".to_string()
    } else {
        format!("Successfully generated {}.", parts.join(" and "))
    }
}

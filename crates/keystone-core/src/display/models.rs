//! Display implementations for domain models.
//!
//! Everything renders as markdown: headings for reports, list items for
//! anything that appears inside a collection.

use std::fmt;

use super::{collections::Steps, datetime::LocalDateTime};
use crate::{
    models::{
        DocumentEntry, GeneratedProjectRecord, GeneratedTask, GenerationOutcome, ProgressStep,
        ProjectBrief, RunState, StepStatus, TaskGroup,
    },
    progress,
};

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ProgressStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- {} ({})", self.label, self.status.with_icon())
    }
}

impl fmt::Display for GeneratedProjectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- **{}**", self.filename)?;
        match (&self.project_name, self.project_id) {
            (Some(name), Some(id)) => writeln!(f, " → {name} (ID: {id})"),
            (Some(name), None) => writeln!(f, " → {name}"),
            (None, Some(id)) => writeln!(f, " → Project #{id}"),
            (None, None) => writeln!(f, " (brief generated, no linked project)"),
        }
    }
}

impl fmt::Display for DocumentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- **{}**", self.document.filename)?;
        if let Some(size) = self.document.size {
            write!(f, " ({size} bytes)")?;
        }
        match &self.record {
            Some(record) => match (&record.project_name, record.project_id) {
                (Some(name), _) => writeln!(f, " - project generated: {name}"),
                (None, Some(id)) => writeln!(f, " - project generated: Project #{id}"),
                (None, None) => writeln!(f, " - project generated"),
            },
            None => writeln!(f),
        }
    }
}

impl fmt::Display for GeneratedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- {}", self.title)?;
        match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) => write!(f, " ({start} → {end})")?,
            (Some(start), None) => write!(f, " (from {start})")?,
            (None, Some(end)) => write!(f, " (until {end})")?,
            (None, None) => {}
        }
        writeln!(f)?;
        if let Some(description) = &self.description {
            writeln!(f, "  {description}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TaskGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Tasks for {} (ID: {})", self.project_name, self.project_id)?;
        writeln!(f)?;
        if self.tasks.is_empty() {
            writeln!(f, "No tasks generated.")?;
        }
        for task in &self.tasks {
            write!(f, "{task}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for ProjectBrief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Project Brief: {}", self.name)?;
        writeln!(f)?;
        if let Some(start) = &self.start_date {
            writeln!(f, "- **Start**: {start}")?;
        }
        if let Some(end) = &self.end_date {
            writeln!(f, "- **End**: {end}")?;
        }
        if let Some(budget) = self.budget_estimate {
            writeln!(f, "- **Budget estimate**: {budget:.2}")?;
        }
        if let Some(description) = &self.description {
            writeln!(f)?;
            writeln!(f, "{description}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Generation Result")?;
        writeln!(f)?;

        if let Some(summary) = &self.summary_message {
            writeln!(f, "{summary}")?;
            writeln!(f)?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "**Error**: {error}")?;
            writeln!(f)?;
        }

        if let Some(brief) = &self.brief {
            write!(f, "{brief}")?;
        }
        if let Some(project) = &self.created_project {
            writeln!(f, "Created project **{}** (ID: {})", project.name, project.id)?;
            writeln!(f)?;
        }
        for group in &self.task_groups {
            write!(f, "{group}")?;
        }

        writeln!(f, "_Finished {}_", LocalDateTime(&self.finished_at))
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (completed, total) = progress::progress_counts(&self.steps);
        writeln!(f, "## Progress ({completed}/{total})")?;
        writeln!(f)?;
        write!(f, "{}", Steps(self.steps.clone()))?;

        if let Some(error) = &self.error {
            writeln!(f)?;
            writeln!(f, "**Error**: {error}")?;
        } else if let Some(message) = &self.success_message {
            writeln!(f)?;
            writeln!(f, "{message}")?;
        }
        Ok(())
    }
}

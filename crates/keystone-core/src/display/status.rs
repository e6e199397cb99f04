//! Status and confirmation message types for operation feedback.

use std::fmt;

use crate::models::{GenerationOutcome, OutcomeStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Success,
    Warning,
    Failure,
}

/// One-line confirmation or failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationStatus {
    message: String,
    level: Level,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Level::Success,
        }
    }

    /// Completed, but with something the user should look at.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Level::Warning,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Level::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == Level::Success
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&GenerationOutcome> for OperationStatus {
    fn from(outcome: &GenerationOutcome) -> Self {
        match outcome.status() {
            OutcomeStatus::Succeeded => Self::success(
                outcome
                    .summary_message
                    .clone()
                    .unwrap_or_else(|| "Generation finished".to_string()),
            ),
            OutcomeStatus::PartiallyFailed => Self::warning(format!(
                "{} (partial results kept)",
                outcome.error.as_deref().unwrap_or_default()
            )),
            OutcomeStatus::Failed => Self::failure(outcome.error.clone().unwrap_or_default()),
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.level {
            Level::Success => "Success:",
            Level::Warning => "Warning:",
            Level::Failure => "Error:",
        };
        writeln!(f, "{prefix} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectBrief, TaskGroup};

    #[test]
    fn test_operation_status_display() {
        assert_eq!(
            OperationStatus::success("Ledger cleared").to_string(),
            "Success: Ledger cleared\n"
        );
        assert!(OperationStatus::failure("Boom").to_string().starts_with("Error:"));
        assert!(!OperationStatus::warning("Careful").is_success());
    }

    #[test]
    fn test_status_from_outcome() {
        let mut outcome = GenerationOutcome::empty();
        outcome.error = Some("Model quota exceeded".to_string());
        let status = OperationStatus::from(&outcome);
        assert_eq!(status.to_string(), "Error: Model quota exceeded\n");

        outcome.task_groups.push(TaskGroup {
            project_id: 7,
            project_name: "Tower".to_string(),
            tasks: vec![],
        });
        assert!(OperationStatus::from(&outcome)
            .to_string()
            .starts_with("Warning: Model quota exceeded"));

        outcome.error = None;
        outcome.brief = Some(ProjectBrief {
            name: "Tower".to_string(),
            description: None,
            start_date: None,
            end_date: None,
            budget_estimate: None,
        });
        outcome.summary_message = Some("Successfully generated project brief.".to_string());
        assert!(OperationStatus::from(&outcome).is_success());
    }
}

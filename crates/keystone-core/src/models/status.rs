//! Status enumeration for progress steps.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of progress step statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    /// Step has not started yet
    #[default]
    Pending,

    /// Step is currently running
    InProgress,

    /// Step finished successfully
    Completed,

    /// Step failed, or was running when the run failed
    Error,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "in-progress" | "in_progress" | "inprogress" => Ok(StepStatus::InProgress),
            "completed" => Ok(StepStatus::Completed),
            "error" => Ok(StepStatus::Error),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Stable string representation, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in-progress",
            StepStatus::Completed => "completed",
            StepStatus::Error => "error",
        }
    }

    /// Completed and error are final for a step.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Error)
    }

    /// Whether moving from `self` to `next` is a forward transition.
    ///
    /// Statuses only move forward: pending → in-progress → completed, and any
    /// non-terminal status may move to error. Re-applying the current status,
    /// moving backwards, or leaving a terminal status is rejected.
    pub fn can_transition_to(&self, next: StepStatus) -> bool {
        use StepStatus::*;

        matches!(
            (self, next),
            (Pending, InProgress) | (Pending, Completed) | (InProgress, Completed)
        ) || (!self.is_terminal() && next == Error)
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keystone_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::InProgress.with_icon(), "➤ In Progress");
    /// assert_eq!(StepStatus::Pending.with_icon(), "○ Pending");
    /// assert_eq!(StepStatus::Error.with_icon(), "✗ Error");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Completed => "✓ Completed",
            StepStatus::InProgress => "➤ In Progress",
            StepStatus::Pending => "○ Pending",
            StepStatus::Error => "✗ Error",
        }
    }
}

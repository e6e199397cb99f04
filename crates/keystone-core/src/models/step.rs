//! Progress step model.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{ProjectId, StepStatus};

/// Identity of a progress step within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    /// Local setup, completed before any network call
    Context,
    /// Project brief generation
    Project,
    /// Task generation for one target project
    Tasks(ProjectId),
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepId::Context => write!(f, "context"),
            StepId::Project => write!(f, "project"),
            StepId::Tasks(id) => write!(f, "tasks-{id}"),
        }
    }
}

impl FromStr for StepId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "context" => Ok(StepId::Context),
            "project" => Ok(StepId::Project),
            other => other
                .strip_prefix("tasks-")
                .and_then(|id| id.parse().ok())
                .map(StepId::Tasks)
                .ok_or_else(|| format!("Invalid step id: {s}")),
        }
    }
}

impl Serialize for StepId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StepId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One visible unit of progress within a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressStep {
    /// Identity of the step
    pub id: StepId,

    /// Label shown to the user, frozen when the run is built
    pub label: String,

    /// Current status of the step
    pub status: StepStatus,
}

impl ProgressStep {
    /// Creates a step in the given status.
    pub fn new(id: StepId, label: impl Into<String>, status: StepStatus) -> Self {
        Self {
            id,
            label: label.into(),
            status,
        }
    }
}

//! Projects, documents and the generated artifacts exchanged with the backend.

use serde::{Deserialize, Serialize};

use super::{GeneratedProjectRecord, ProjectId};

/// A project as returned by the project directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_project_status")]
    pub status: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
}

impl Project {
    /// Minimal project with only an id and a name.
    pub fn named(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            status: default_project_status(),
            start_date: None,
            end_date: None,
            budget: None,
        }
    }
}

/// Payload for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub budget: Option<f64>,
}

fn default_project_status() -> String {
    "active".to_string()
}

/// Reference to the project a brief produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectRef {
    pub id: ProjectId,
    pub name: String,
}

impl From<&Project> for ProjectRef {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
        }
    }
}

/// AI-produced structured project summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectBrief {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, alias = "budget")]
    pub budget_estimate: Option<f64>,
}

impl From<&ProjectBrief> for NewProject {
    fn from(brief: &ProjectBrief) -> Self {
        Self {
            name: brief.name.clone(),
            description: brief.description.clone(),
            status: default_project_status(),
            start_date: brief.start_date.clone(),
            end_date: brief.end_date.clone(),
            budget: brief.budget_estimate,
        }
    }
}

/// A task produced from a document for one project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedTask {
    #[serde(alias = "task_name")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// An uploaded source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Non-empty filename, the ledger key
    pub filename: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

impl Document {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            size: None,
            uploaded_at: None,
        }
    }
}

/// A document paired with the ledger record it produced, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEntry {
    pub document: Document,
    pub record: Option<GeneratedProjectRecord>,
}

impl DocumentEntry {
    /// Whether a brief was already generated from this document.
    pub fn has_generated_project(&self) -> bool {
        self.record.is_some()
    }
}

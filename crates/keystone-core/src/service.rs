//! Boundaries to the external collaborators of a generation run.
//!
//! The orchestrator only talks to these traits. [`crate::client::ApiClient`]
//! implements all of them over HTTP; tests substitute in-process fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{Document, GeneratedTask, NewProject, Project, ProjectBrief, ProjectId},
};

/// Lists uploaded source documents.
#[async_trait]
pub trait DocumentDirectory: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<Document>>;
}

/// Reads and creates projects.
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>>;

    async fn create_project(&self, payload: &NewProject) -> Result<Project>;
}

/// The AI-backed generation endpoints.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generates a project brief from a document.
    ///
    /// With `persist` the service also tries to create the project; the
    /// response reports whether it did.
    async fn generate_project_brief(&self, filename: &str, persist: bool) -> Result<BriefResponse>;

    /// Generates tasks for one project from a document.
    async fn generate_tasks_from_document(
        &self,
        filename: &str,
        project_id: ProjectId,
        options: TaskOptions,
    ) -> Result<TaskResponse>;
}

/// Response of the brief endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BriefResponse {
    pub brief: ProjectBrief,
    /// Whether the service created the project itself
    #[serde(default)]
    pub persisted: bool,
    #[serde(default)]
    pub created_project: Option<Project>,
    #[serde(default)]
    pub raw_response: Option<String>,
}

/// Options for task generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskOptions {
    pub max_tasks: u8,
    pub persist: bool,
}

/// Response of the task endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskResponse {
    #[serde(default)]
    pub tasks: Vec<GeneratedTask>,
    #[serde(default)]
    pub thinking_log: Option<Vec<String>>,
    #[serde(default)]
    pub raw_response: Option<String>,
}

impl TaskResponse {
    /// Non-blank thinking log lines reported by the service.
    pub fn thinking_lines(&self) -> Vec<String> {
        self.thinking_log
            .iter()
            .flatten()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

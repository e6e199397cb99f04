#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use keystone_core::{
    models::{GeneratedTask, NewProject, ProjectBrief},
    service::{BriefResponse, TaskOptions, TaskResponse},
    GenerationError, GenerationService, Orchestrator, OrchestratorBuilder, Project,
    ProjectDirectory, ProjectId, Result,
};
use tempfile::TempDir;

/// In-process stand-in for the backend: a fixed project list plus scripted
/// generation responses.
#[derive(Default)]
pub struct FakeBackend {
    pub projects: Mutex<Vec<Project>>,
    pub brief: Mutex<Option<BriefResponse>>,
    pub tasks: Mutex<HashMap<ProjectId, TaskResponse>>,
    pub failures: Mutex<HashMap<ProjectId, String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        let backend = Self::default();
        *backend.projects.lock().unwrap() = projects;
        backend
    }

    pub fn script_brief(&self, name: &str, persisted: bool) {
        let brief = ProjectBrief {
            name: name.to_string(),
            description: Some(format!("{name} generated from the source document")),
            start_date: Some("2026-03-01".to_string()),
            end_date: Some("2026-11-30".to_string()),
            budget_estimate: Some(120_000.0),
        };
        *self.brief.lock().unwrap() = Some(BriefResponse {
            brief,
            persisted,
            created_project: None,
            raw_response: Some(format!(
                "The document describes {name}. Work is split into three phases."
            )),
        });
    }

    pub fn script_tasks(&self, project_id: ProjectId, titles: &[&str]) {
        let tasks = titles
            .iter()
            .map(|title| GeneratedTask {
                title: title.to_string(),
                description: None,
                start_date: None,
                end_date: None,
                status: Some("pending".to_string()),
            })
            .collect();
        self.tasks.lock().unwrap().insert(
            project_id,
            TaskResponse {
                tasks,
                thinking_log: None,
                raw_response: None,
            },
        );
    }

    pub fn fail_tasks(&self, project_id: ProjectId, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(project_id, message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProjectDirectory for FakeBackend {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn create_project(&self, payload: &NewProject) -> Result<Project> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("create:{}", payload.name));
        let mut projects = self.projects.lock().unwrap();
        let id = projects.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let project = Project::named(id, payload.name.clone());
        projects.push(project.clone());
        Ok(project)
    }
}

#[async_trait]
impl GenerationService for FakeBackend {
    async fn generate_project_brief(&self, filename: &str, _persist: bool) -> Result<BriefResponse> {
        self.calls.lock().unwrap().push(format!("brief:{filename}"));
        let scripted = self.brief.lock().unwrap().clone();
        scripted.ok_or_else(|| {
            GenerationError::service("Generate project brief")
                .with_status(404)
                .with_message(format!("Document not found: {filename}"))
        })
    }

    async fn generate_tasks_from_document(
        &self,
        _filename: &str,
        project_id: ProjectId,
        options: TaskOptions,
    ) -> Result<TaskResponse> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("tasks:{project_id}:{}", options.max_tasks));
        let failure = self.failures.lock().unwrap().get(&project_id).cloned();
        if let Some(message) = failure {
            return Err(GenerationError::service("Generate tasks")
                .with_status(500)
                .with_message(message));
        }
        let scripted = self.tasks.lock().unwrap().get(&project_id).cloned();
        Ok(scripted.unwrap_or(TaskResponse {
            tasks: vec![],
            thinking_log: None,
            raw_response: None,
        }))
    }
}

/// Helper function to create an orchestrator backed by a temporary database.
pub async fn create_test_orchestrator(backend: Arc<FakeBackend>) -> (TempDir, Orchestrator) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("keystone.db");
    let orchestrator = build_orchestrator(&temp_dir, backend).await;
    assert!(db_path.exists());
    (temp_dir, orchestrator)
}

/// Builds another orchestrator over the same database, as a new session would.
pub async fn build_orchestrator(temp_dir: &TempDir, backend: Arc<FakeBackend>) -> Orchestrator {
    OrchestratorBuilder::new()
        .with_database_path(Some(temp_dir.path().join("keystone.db")))
        .with_generation_service(backend.clone())
        .with_project_directory(backend)
        .with_feed_spacing(Duration::from_millis(500))
        .build()
        .await
        .expect("Failed to create orchestrator")
}

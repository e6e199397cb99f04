//! Tests for the orchestrator module.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use tokio::time::sleep;

use super::{run::summary_message, *};
use crate::{
    models::{
        GeneratedTask, GenerationOutcome, GenerationPlan, NewProject, OutcomeStatus, ProjectBrief,
        ProjectId, StepStatus, TaskGroup,
    },
    service::{BriefResponse, TaskOptions, TaskResponse},
    store::{KeyValueStore, MemoryStore, LEDGER_KEY},
};

#[derive(Default)]
struct FakeGeneration {
    brief: Mutex<Option<std::result::Result<BriefResponse, String>>>,
    tasks: Mutex<HashMap<ProjectId, std::result::Result<TaskResponse, String>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeGeneration {
    fn with_brief(self, response: BriefResponse) -> Self {
        *self.brief.lock().unwrap() = Some(Ok(response));
        self
    }

    fn with_tasks(self, project_id: ProjectId, response: TaskResponse) -> Self {
        self.tasks.lock().unwrap().insert(project_id, Ok(response));
        self
    }

    fn failing_brief(self, message: &str) -> Self {
        *self.brief.lock().unwrap() = Some(Err(message.to_string()));
        self
    }

    fn failing_tasks(self, project_id: ProjectId, message: &str) -> Self {
        self.tasks
            .lock()
            .unwrap()
            .insert(project_id, Err(message.to_string()));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for FakeGeneration {
    async fn generate_project_brief(&self, filename: &str, persist: bool) -> Result<BriefResponse> {
        assert!(persist);
        self.calls.lock().unwrap().push(format!("brief:{filename}"));
        let scripted = self.brief.lock().unwrap().clone();
        match scripted {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(GenerationError::service("Generate project brief")
                .with_status(500)
                .with_message(message)),
            None => panic!("unexpected brief call"),
        }
    }

    async fn generate_tasks_from_document(
        &self,
        _filename: &str,
        project_id: ProjectId,
        options: TaskOptions,
    ) -> Result<TaskResponse> {
        assert!(options.persist);
        self.calls
            .lock()
            .unwrap()
            .push(format!("tasks-{project_id}:{}", options.max_tasks));
        let scripted = self.tasks.lock().unwrap().get(&project_id).cloned();
        match scripted {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(GenerationError::service("Generate tasks")
                .with_status(502)
                .with_message(message)),
            None => panic!("unexpected task call for project {project_id}"),
        }
    }
}

#[derive(Default)]
struct FakeProjects {
    created: Mutex<Vec<NewProject>>,
    failure: Option<String>,
}

impl FakeProjects {
    fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ProjectDirectory for FakeProjects {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(vec![])
    }

    async fn create_project(&self, payload: &NewProject) -> Result<Project> {
        if let Some(message) = &self.failure {
            return Err(GenerationError::service("Create project")
                .with_status(503)
                .with_message(message.clone()));
        }
        let mut created = self.created.lock().unwrap();
        created.push(payload.clone());
        Ok(Project::named(100 + created.len() as u64, payload.name.clone()))
    }
}

struct ReadOnlyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        Err(GenerationError::Configuration {
            message: format!("store is read-only: {key}"),
        })
    }

    async fn remove(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }
}

fn brief(name: &str) -> ProjectBrief {
    ProjectBrief {
        name: name.to_string(),
        description: Some("Renovation of the east wing".to_string()),
        start_date: None,
        end_date: None,
        budget_estimate: Some(250_000.0),
    }
}

fn persisted_brief(name: &str, id: ProjectId) -> BriefResponse {
    BriefResponse {
        brief: brief(name),
        persisted: true,
        created_project: Some(Project::named(id, name)),
        raw_response: None,
    }
}

fn tasks(titles: &[&str]) -> TaskResponse {
    TaskResponse {
        tasks: titles
            .iter()
            .map(|title| GeneratedTask {
                title: title.to_string(),
                description: None,
                start_date: None,
                end_date: None,
                status: None,
            })
            .collect(),
        thinking_log: None,
        raw_response: None,
    }
}

fn plan(brief: bool, projects: Vec<ProjectId>) -> GenerationPlan {
    GenerationPlan {
        source_filename: "Plan.pdf".to_string(),
        generate_project_brief: brief,
        generate_tasks: !projects.is_empty(),
        target_project_ids: projects,
        max_tasks_per_project: 5,
    }
}

fn live_projects() -> Vec<Project> {
    vec![Project::named(7, "Tower"), Project::named(9, "Depot")]
}

async fn orchestrator(
    generation: Arc<FakeGeneration>,
    projects: Arc<FakeProjects>,
    store: Arc<dyn KeyValueStore>,
) -> Orchestrator {
    OrchestratorBuilder::new()
        .with_store(store)
        .with_generation_service(generation)
        .with_project_directory(projects)
        .with_feed_spacing(Duration::from_millis(1000))
        .build()
        .await
        .expect("Failed to build orchestrator")
}

fn statuses(orchestrator: &Orchestrator) -> Vec<(String, StepStatus)> {
    orchestrator
        .state()
        .steps
        .iter()
        .map(|step| (step.id.to_string(), step.status))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_task_failure_after_brief_keeps_partial_results() {
    let generation = Arc::new(
        FakeGeneration::default()
            .with_brief(persisted_brief("Tower", 7))
            .failing_tasks(7, "Model quota exceeded"),
    );
    let mut orchestrator = orchestrator(
        generation,
        Arc::new(FakeProjects::default()),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let outcome = orchestrator.run(plan(true, vec![7]), &live_projects()).await;

    assert_eq!(outcome.error.as_deref(), Some("Model quota exceeded"));
    assert_eq!(outcome.brief.as_ref().map(|b| b.name.as_str()), Some("Tower"));
    assert_eq!(outcome.status(), OutcomeStatus::PartiallyFailed);
    assert!(outcome.summary_message.is_none());
    assert_eq!(
        statuses(&orchestrator),
        [
            ("context".to_string(), StepStatus::Completed),
            ("project".to_string(), StepStatus::Completed),
            ("tasks-7".to_string(), StepStatus::Error),
        ]
    );

    let state = orchestrator.state();
    assert!(state.terminal);
    assert!(!state.running);
    assert_eq!(state.error.as_deref(), Some("Model quota exceeded"));
}

#[tokio::test(start_paused = true)]
async fn test_brief_failure_fails_run_before_any_task_call() {
    let store = Arc::new(MemoryStore::new());
    let generation = Arc::new(
        FakeGeneration::default()
            .failing_brief("No text in document")
            .with_tasks(7, tasks(&["Pour foundation"])),
    );
    let mut orchestrator = orchestrator(
        generation.clone(),
        Arc::new(FakeProjects::default()),
        store.clone(),
    )
    .await;

    let outcome = orchestrator.run(plan(true, vec![7]), &live_projects()).await;

    assert_eq!(outcome.error.as_deref(), Some("No text in document"));
    assert_eq!(outcome.status(), OutcomeStatus::Failed);
    assert!(outcome.brief.is_none());
    assert!(outcome.created_project.is_none());
    assert_eq!(generation.calls(), ["brief:Plan.pdf"]);
    assert_eq!(
        statuses(&orchestrator),
        [
            ("context".to_string(), StepStatus::Completed),
            ("project".to_string(), StepStatus::Error),
            ("tasks-7".to_string(), StepStatus::Pending),
        ]
    );
    assert!(orchestrator.ledger().is_empty());
    assert_eq!(store.get(LEDGER_KEY).await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_failed_project_creation_keeps_brief_without_ledger_record() {
    let store = Arc::new(MemoryStore::new());
    let generation = Arc::new(FakeGeneration::default().with_brief(BriefResponse {
        brief: brief("Harbor Depot"),
        persisted: false,
        created_project: None,
        raw_response: None,
    }));
    let mut orchestrator = orchestrator(
        generation,
        Arc::new(FakeProjects::failing("Projects database unavailable")),
        store.clone(),
    )
    .await;

    let outcome = orchestrator.run(plan(true, vec![]), &[]).await;

    assert_eq!(outcome.error.as_deref(), Some("Projects database unavailable"));
    assert_eq!(
        outcome.brief.as_ref().map(|b| b.name.as_str()),
        Some("Harbor Depot")
    );
    assert!(outcome.created_project.is_none());
    assert_eq!(outcome.status(), OutcomeStatus::PartiallyFailed);
    assert_eq!(
        statuses(&orchestrator),
        [
            ("context".to_string(), StepStatus::Completed),
            ("project".to_string(), StepStatus::Error),
        ]
    );
    assert!(orchestrator.ledger().is_empty());
    assert_eq!(store.get(LEDGER_KEY).await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_failure_stops_remaining_projects() {
    let generation = Arc::new(
        FakeGeneration::default()
            .failing_tasks(9, "Document could not be parsed")
            .with_tasks(7, tasks(&["Pour foundation"])),
    );
    let mut orchestrator = orchestrator(
        generation.clone(),
        Arc::new(FakeProjects::default()),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let outcome = orchestrator.run(plan(false, vec![9, 7]), &live_projects()).await;

    assert_eq!(outcome.status(), OutcomeStatus::Failed);
    assert_eq!(generation.calls(), ["tasks-9:5"]);
    assert_eq!(
        statuses(&orchestrator),
        [
            ("context".to_string(), StepStatus::Completed),
            ("tasks-9".to_string(), StepStatus::Error),
            ("tasks-7".to_string(), StepStatus::Pending),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_full_success_runs_sequentially_and_summarizes() {
    let generation = Arc::new(
        FakeGeneration::default()
            .with_brief(persisted_brief("Tower", 7))
            .with_tasks(9, tasks(&["Survey site", "Order steel"]))
            .with_tasks(7, tasks(&["Pour foundation"])),
    );
    let mut orchestrator = orchestrator(
        generation.clone(),
        Arc::new(FakeProjects::default()),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let outcome = orchestrator.run(plan(true, vec![9, 7]), &live_projects()).await;

    assert_eq!(
        generation.calls(),
        ["brief:Plan.pdf", "tasks-9:5", "tasks-7:5"]
    );
    assert_eq!(outcome.status(), OutcomeStatus::Succeeded);
    assert_eq!(
        outcome.summary_message.as_deref(),
        Some("Successfully generated project brief and 2 task sets.")
    );
    assert_eq!(outcome.task_count(), 3);
    assert_eq!(outcome.task_groups[0].project_name, "Depot");
    assert_eq!(outcome.task_groups[1].project_name, "Tower");

    let state = orchestrator.state();
    assert!(state.terminal);
    assert!(state.steps.iter().all(|s| s.status == StepStatus::Completed));
    assert_eq!(state.success_message, outcome.summary_message);
}

#[tokio::test(start_paused = true)]
async fn test_unpersisted_brief_creates_project() {
    let generation = Arc::new(FakeGeneration::default().with_brief(BriefResponse {
        brief: brief("Harbor Depot"),
        persisted: false,
        created_project: None,
        raw_response: None,
    }));
    let projects = Arc::new(FakeProjects::default());
    let mut orchestrator = orchestrator(
        generation,
        projects.clone(),
        Arc::new(MemoryStore::new()),
    )
    .await;

    let outcome = orchestrator.run(plan(true, vec![]), &[]).await;

    let created = projects.created.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name, "Harbor Depot");
    assert_eq!(created[0].budget, Some(250_000.0));

    let project = outcome.created_project.expect("created project");
    assert_eq!((project.id, project.name.as_str()), (101, "Harbor Depot"));
    assert_eq!(
        outcome.summary_message.as_deref(),
        Some("Successfully generated project brief.")
    );
}

#[tokio::test(start_paused = true)]
async fn test_persisted_brief_skips_project_creation() {
    let generation = Arc::new(FakeGeneration::default().with_brief(persisted_brief("Tower", 7)));
    let projects = Arc::new(FakeProjects::default());
    let mut orchestrator =
        orchestrator(generation, projects.clone(), Arc::new(MemoryStore::new())).await;

    let outcome = orchestrator.run(plan(true, vec![]), &[]).await;

    assert!(projects.created.lock().unwrap().is_empty());
    assert_eq!(outcome.created_project.map(|p| p.id), Some(7));
}

#[tokio::test(start_paused = true)]
async fn test_brief_records_ledger_entry_and_persists_it() {
    let store = Arc::new(MemoryStore::new());
    let generation = Arc::new(FakeGeneration::default().with_brief(persisted_brief("Tower", 7)));
    let mut orchestrator =
        orchestrator(generation, Arc::new(FakeProjects::default()), store.clone()).await;
    let ledger_updates = orchestrator.subscribe_ledger();

    orchestrator.run(plan(true, vec![]), &[]).await;

    assert!(ledger_updates.has_changed().unwrap());
    let records = orchestrator.ledger();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].filename, "Plan.pdf");
    assert_eq!(records[0].project_id, Some(7));
    assert_eq!(records[0].project_name.as_deref(), Some("Tower"));

    let stored = store.get(LEDGER_KEY).await.unwrap().expect("ledger persisted");
    assert!(stored.contains("\"projectId\":7"));
}

#[tokio::test(start_paused = true)]
async fn test_ledger_write_failure_does_not_fail_run() {
    let generation = Arc::new(FakeGeneration::default().with_brief(persisted_brief("Tower", 7)));
    let mut orchestrator = orchestrator(
        generation,
        Arc::new(FakeProjects::default()),
        Arc::new(ReadOnlyStore),
    )
    .await;

    let outcome = orchestrator.run(plan(true, vec![]), &[]).await;

    assert!(outcome.error.is_none());
    assert_eq!(orchestrator.ledger().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_feed_prefers_service_thinking_log() {
    let mut response = tasks(&["Survey site"]);
    response.thinking_log = Some(vec!["Scanning scope".to_string(), "Grouping work".to_string()]);
    response.raw_response = Some("This raw text should not be used at all.".to_string());
    let generation = Arc::new(FakeGeneration::default().with_tasks(7, response));
    let mut orchestrator = orchestrator(
        generation,
        Arc::new(FakeProjects::default()),
        Arc::new(MemoryStore::new()),
    )
    .await;

    orchestrator.run(plan(false, vec![7]), &live_projects()).await;

    sleep(Duration::from_millis(1010)).await;
    let texts: Vec<String> = orchestrator.feed().lines().into_iter().map(|l| l.text).collect();
    assert_eq!(texts, ["Scanning scope", "Grouping work"]);
}

#[tokio::test(start_paused = true)]
async fn test_feed_falls_back_when_nothing_to_extract() {
    let generation = Arc::new(FakeGeneration::default().with_tasks(9, tasks(&[])));
    let mut orchestrator = orchestrator(
        generation,
        Arc::new(FakeProjects::default()),
        Arc::new(MemoryStore::new()),
    )
    .await;

    orchestrator.run(plan(false, vec![9]), &live_projects()).await;

    sleep(Duration::from_millis(10)).await;
    let lines = orchestrator.feed().lines();
    assert_eq!(lines[0].text, "Reviewing the scope for Depot...");
}

#[tokio::test(start_paused = true)]
async fn test_brief_feed_uses_raw_response_snippets() {
    let mut response = persisted_brief("Tower", 7);
    response.raw_response =
        Some("The tower has twelve floors. Steel frame construction is planned.".to_string());
    let generation = Arc::new(FakeGeneration::default().with_brief(response));
    let mut orchestrator = orchestrator(
        generation,
        Arc::new(FakeProjects::default()),
        Arc::new(MemoryStore::new()),
    )
    .await;

    orchestrator.run(plan(true, vec![]), &[]).await;

    sleep(Duration::from_millis(10)).await;
    assert_eq!(
        orchestrator.feed().lines()[0].text,
        "The tower has twelve floors."
    );
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_clears_feed_and_state() {
    let generation = Arc::new(FakeGeneration::default().with_brief(persisted_brief("Tower", 7)));
    let mut orchestrator = orchestrator(
        generation,
        Arc::new(FakeProjects::default()),
        Arc::new(MemoryStore::new()),
    )
    .await;

    orchestrator.run(plan(true, vec![]), &[]).await;
    sleep(Duration::from_millis(10)).await;
    assert!(!orchestrator.feed().lines().is_empty());

    orchestrator.dismiss().unwrap();

    assert!(orchestrator.feed().lines().is_empty());
    assert_eq!(orchestrator.feed().pending_timers(), 0);
    assert_eq!(orchestrator.state(), RunState::default());
}

#[tokio::test]
async fn test_dismiss_refused_while_running() {
    let mut orchestrator = orchestrator(
        Arc::new(FakeGeneration::default()),
        Arc::new(FakeProjects::default()),
        Arc::new(MemoryStore::new()),
    )
    .await;
    orchestrator.state.send_modify(|state| state.running = true);

    assert!(matches!(
        orchestrator.dismiss(),
        Err(GenerationError::RunInProgress)
    ));
}

#[tokio::test]
async fn test_reconcile_ledger_prunes_and_persists() {
    let store = Arc::new(MemoryStore::with_entry(
        LEDGER_KEY,
        r#"[{"filename":"Plan.pdf","projectId":3,"projectName":"Tower"},"legacy.pdf"]"#,
    ));
    let mut orchestrator = orchestrator(
        Arc::new(FakeGeneration::default()),
        Arc::new(FakeProjects::default()),
        store.clone(),
    )
    .await;
    assert_eq!(orchestrator.ledger().len(), 2);

    assert!(!orchestrator
        .reconcile_ledger(&[Project::named(3, "Tower")])
        .await
        .unwrap());

    assert!(orchestrator.reconcile_ledger(&[]).await.unwrap());
    let records = orchestrator.ledger();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].filename, "legacy.pdf");

    let stored = store.get(LEDGER_KEY).await.unwrap().unwrap();
    assert!(!stored.contains("Plan.pdf"));
}

#[tokio::test]
async fn test_build_requires_services() {
    let result = OrchestratorBuilder::new()
        .with_store(Arc::new(MemoryStore::new()))
        .build()
        .await;

    assert!(matches!(result, Err(GenerationError::Configuration { .. })));
}

#[test]
fn test_summary_message_variants() {
    let mut outcome = GenerationOutcome::empty();
    outcome.task_groups.push(TaskGroup {
        project_id: 7,
        project_name: "Tower".to_string(),
        tasks: vec![],
    });
    assert_eq!(
        summary_message(&outcome),
        "Successfully generated 1 task set."
    );

    outcome.brief = Some(brief("Tower"));
    assert_eq!(
        summary_message(&outcome),
        "Successfully generated project brief and 1 task set."
    );
}

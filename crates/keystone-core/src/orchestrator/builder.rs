//! Builder for creating and configuring Orchestrator instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use log::debug;

use super::Orchestrator;
use crate::{
    error::{GenerationError, Result},
    feed::{ThinkingFeed, DEFAULT_SPACING, LINE_TTL},
    service::{GenerationService, ProjectDirectory},
    store::{KeyValueStore, SessionStore, SqliteStore},
};

/// Builder for creating and configuring Orchestrator instances.
#[derive(Default)]
pub struct OrchestratorBuilder {
    database_path: Option<PathBuf>,
    store: Option<Arc<dyn KeyValueStore>>,
    generation: Option<Arc<dyn GenerationService>>,
    projects: Option<Arc<dyn ProjectDirectory>>,
    feed_spacing: Option<Duration>,
    line_ttl: Option<Duration>,
}

impl OrchestratorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/keystone/keystone.db` or
    /// `~/.local/share/keystone/keystone.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses an existing store instead of opening a database file.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_generation_service(mut self, service: Arc<dyn GenerationService>) -> Self {
        self.generation = Some(service);
        self
    }

    pub fn with_project_directory(mut self, directory: Arc<dyn ProjectDirectory>) -> Self {
        self.projects = Some(directory);
        self
    }

    /// Gap between replayed thinking lines.
    pub fn with_feed_spacing(mut self, spacing: Duration) -> Self {
        self.feed_spacing = Some(spacing);
        self
    }

    /// How long each thinking line stays visible.
    pub fn with_line_ttl(mut self, ttl: Duration) -> Self {
        self.line_ttl = Some(ttl);
        self
    }

    /// Builds the orchestrator and loads the ledger once.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Configuration` if a service is missing,
    /// `GenerationError::FileSystem` or `GenerationError::Database` if the
    /// store cannot be opened.
    pub async fn build(self) -> Result<Orchestrator> {
        let generation = self.generation.ok_or_else(|| GenerationError::Configuration {
            message: "a generation service is required".to_string(),
        })?;
        let projects = self.projects.ok_or_else(|| GenerationError::Configuration {
            message: "a project directory is required".to_string(),
        })?;

        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => {
                let db_path = match self.database_path {
                    Some(path) => path,
                    None => SqliteStore::default_path()?,
                };
                Arc::new(SqliteStore::open(db_path).await?)
            }
        };

        let session = SessionStore::new(store);
        let ledger = session.load_ledger().await?;
        debug!("loaded {} ledger record(s)", ledger.len());

        Ok(Orchestrator::new(
            generation,
            projects,
            session,
            ThinkingFeed::with_ttl(self.line_ttl.unwrap_or(LINE_TTL)),
            self.feed_spacing.unwrap_or(DEFAULT_SPACING),
            ledger,
        ))
    }
}

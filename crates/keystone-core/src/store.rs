//! Local durable string store and the typed session data kept in it.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use log::debug;
use tokio::task;

use crate::{
    db::Database,
    error::{GenerationError, Result, ResultExt},
    ledger::{self, LedgerRecords},
};

/// Key of the serialized generated-project ledger.
pub const LEDGER_KEY: &str = "keystone.generated_projects";
/// Key of the active conversation identifier.
pub const CONVERSATION_KEY: &str = "keystone.active_conversation";

/// A string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`, returning whether it was present.
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// SQLite-backed store; every operation opens the database on a blocking
/// thread.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::FileSystem` if the parent directory cannot be
    /// created, `GenerationError::Database` if schema initialization fails.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| GenerationError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let init_path = db_path.clone();
        task::spawn_blocking(move || Database::new(&init_path).map(drop))
            .await
            .with_context("Task join error")??;

        debug!("opened key-value store at {}", db_path.display());
        Ok(Self { db_path })
    }

    /// Returns the default database path following XDG Base Directory
    /// specification: `$XDG_DATA_HOME/keystone/keystone.db`.
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("keystone")
            .place_data_file("keystone.db")
            .map_err(|e| GenerationError::XdgDirectory(e.to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let db_path = self.db_path.clone();
        let key = key.to_string();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_value(&key)
        })
        .await
        .with_context("Task join error")?
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let db_path = self.db_path.clone();
        let key = key.to_string();
        let value = value.to_string();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.set_value(&key, &value)
        })
        .await
        .with_context("Task join error")?
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let db_path = self.db_path.clone();
        let key = key.to_string();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.remove_value(&key)
        })
        .await
        .with_context("Task join error")?
    }
}

/// Process-local store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::default();
        store
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
        store
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.remove(key).is_some())
    }
}

/// Typed access to the session data kept in a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the ledger. A corrupt blob is treated as an empty ledger.
    pub async fn load_ledger(&self) -> Result<LedgerRecords> {
        Ok(self
            .store
            .get(LEDGER_KEY)
            .await?
            .map_or_else(ledger::empty, |raw| ledger::parse_stored(&raw)))
    }

    pub async fn save_ledger(&self, records: &LedgerRecords) -> Result<()> {
        let blob = ledger::serialize(records)?;
        self.store.set(LEDGER_KEY, &blob).await
    }

    pub async fn clear_ledger(&self) -> Result<bool> {
        self.store.remove(LEDGER_KEY).await
    }

    pub async fn active_conversation(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(CONVERSATION_KEY)
            .await?
            .filter(|id| !id.trim().is_empty()))
    }

    /// Records the active conversation id.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Validation` for a blank id.
    pub async fn set_active_conversation(&self, id: &str) -> Result<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(GenerationError::validation("conversation_id")
                .with_reason("Conversation id must not be empty"));
        }
        self.store.set(CONVERSATION_KEY, id).await
    }

    pub async fn clear_active_conversation(&self) -> Result<bool> {
        self.store.remove(CONVERSATION_KEY).await
    }
}

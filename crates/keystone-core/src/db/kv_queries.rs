//! Key-value queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use crate::error::{DatabaseResultExt, Result};

const SELECT_VALUE_SQL: &str = "SELECT value FROM kv_entries WHERE key = ?1";
const UPSERT_VALUE_SQL: &str = "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";
const DELETE_VALUE_SQL: &str = "DELETE FROM kv_entries WHERE key = ?1";
#[cfg(test)]
const SELECT_UPDATED_AT_SQL: &str = "SELECT updated_at FROM kv_entries WHERE key = ?1";

impl super::Database {
    /// Reads the value stored under `key`.
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.connection
            .query_row(SELECT_VALUE_SQL, params![key], |row| row.get(0))
            .optional()
            .db_context("Failed to read stored value")
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let now = Timestamp::now().to_string();
        self.connection
            .execute(UPSERT_VALUE_SQL, params![key, value, now])
            .db_context("Failed to store value")?;
        Ok(())
    }

    /// Removes `key`. Returns whether a value was stored.
    pub fn remove_value(&mut self, key: &str) -> Result<bool> {
        let removed = self
            .connection
            .execute(DELETE_VALUE_SQL, params![key])
            .db_context("Failed to remove stored value")?;
        Ok(removed > 0)
    }

    /// When `key` was last written, if it is stored and the timestamp parses.
    #[cfg(test)]
    pub(crate) fn updated_at(&self, key: &str) -> Result<Option<Timestamp>> {
        let raw: Option<String> = self
            .connection
            .query_row(SELECT_UPDATED_AT_SQL, params![key], |row| row.get(0))
            .optional()
            .db_context("Failed to read entry timestamp")?;
        Ok(raw.and_then(|raw| raw.parse().ok()))
    }
}

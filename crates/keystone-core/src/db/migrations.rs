//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // WAL lets a reader (e.g. `keystone ledger show`) run beside a writer.
        self.connection
            .query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .db_context("Failed to enable WAL journal")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Early builds stored entries without a timestamp column.
        let has_updated_at: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('kv_entries') WHERE name = 'updated_at'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_updated_at {
            self.connection
                .execute(
                    "ALTER TABLE kv_entries ADD COLUMN updated_at TEXT NOT NULL DEFAULT ''",
                    [],
                )
                .db_context("Failed to add updated_at column to kv_entries table")?;
        }

        Ok(())
    }
}

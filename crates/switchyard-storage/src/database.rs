// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection management for the ledger database.
//!
//! Every statement runs on tokio-rusqlite's single background thread, which
//! serializes writes. Open one [`Database`] per file and share it.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use switchyard_config::model::StorageConfig;
use switchyard_core::{AdapterType, HealthStatus, PluginAdapter, SwitchyardError};
use tracing::debug;

use crate::migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Convert a tokio-rusqlite error into [`SwitchyardError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SwitchyardError {
    SwitchyardError::Storage {
        source: Box::new(e),
    }
}

/// A migrated SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
    label: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("label", &self.label).finish()
    }
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode.
    pub async fn open(path: &str) -> Result<Self, SwitchyardError> {
        Self::open_with(path, true).await
    }

    /// Open the database described by `[storage]` config.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, SwitchyardError> {
        Self::open_with(&config.database_path, config.wal_mode).await
    }

    /// Private in-memory database with the schema applied. Used by tests
    /// and dry runs.
    pub async fn open_in_memory() -> Result<Self, SwitchyardError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| SwitchyardError::Storage {
                source: Box::new(e),
            })?;
        Self::prepare(conn, ":memory:".to_string(), false).await
    }

    async fn open_with(path: &str, wal_mode: bool) -> Result<Self, SwitchyardError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| SwitchyardError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| SwitchyardError::Storage {
                source: Box::new(e),
            })?;
        Self::prepare(conn, path.to_string(), wal_mode).await
    }

    async fn prepare(
        conn: tokio_rusqlite::Connection,
        label: String,
        wal_mode: bool,
    ) -> Result<Self, SwitchyardError> {
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            if wal_mode {
                let mode: String =
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
                debug!(journal_mode = %mode, "journal mode set");
                conn.pragma_update(None, "synchronous", "NORMAL")?;
            }
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| Ok::<_, rusqlite::Error>(migrations::run_migrations(conn)))
            .await
            .map_err(map_tr_err)??;

        debug!(database = %label, wal_mode, "database ready");
        Ok(Self { conn, label })
    }

    /// The underlying connection handle.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// The path this database was opened from, or `:memory:`.
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[async_trait]
impl PluginAdapter for Database {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SwitchyardError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    /// Checkpoints the WAL so the database file is self-contained.
    async fn shutdown(&self) -> Result<(), SwitchyardError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(database = %self.label, "WAL checkpoint complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_names(db: &Database) -> Vec<String> {
        db.connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type IN ('table', 'index') ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn in_memory_database_is_migrated() {
        let db = Database::open_in_memory().await.unwrap();
        let names = table_names(&db).await;
        assert!(names.contains(&"cost_ledger".to_string()));
        assert!(names.contains(&"idx_cost_ledger_tenant_created".to_string()));
        assert!(names.contains(&"idx_cost_ledger_feature_created".to_string()));
        assert_eq!(db.label(), ":memory:");
    }

    #[tokio::test]
    async fn file_database_uses_wal_and_reopens_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.db");
        let path = path.to_str().unwrap();

        let db = Database::open(path).await.unwrap();
        let mode: String = db
            .connection()
            .call(|conn| conn.query_row("PRAGMA journal_mode", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        db.shutdown().await.unwrap();
        drop(db);

        // second open finds the migration already applied
        let again = Database::open(path).await.unwrap();
        assert_eq!(again.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn config_can_disable_wal() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("plain.db").to_str().unwrap().to_string(),
            wal_mode: false,
        };
        let db = Database::from_config(&config).await.unwrap();
        let mode: String = db
            .connection()
            .call(|conn| conn.query_row("PRAGMA journal_mode", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "delete");
    }

    #[tokio::test]
    async fn adapter_identity() {
        let db = Database::open_in_memory().await.unwrap();
        assert_eq!(db.name(), "sqlite");
        assert_eq!(db.adapter_type(), AdapterType::Storage);
    }
}

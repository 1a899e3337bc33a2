/// Storage areas backed by redb.
///
/// Uses a single redb database file with one table per scope:
/// - `storage_local`: key → JSON text for the local scope
/// - `storage_sync`: key → JSON text for the sync scope
///
/// Values are kept as raw `&str` JSON so the file stays inspectable.
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde_json::Value;

use tab_shelf_config::StorageScope;

use super::StorageArea;
use crate::error::StorageError;

/// Local scope table: key → JSON text.
const LOCAL_TABLE: TableDefinition<&str, &str> = TableDefinition::new("storage_local");

/// Sync scope table: key → JSON text.
const SYNC_TABLE: TableDefinition<&str, &str> = TableDefinition::new("storage_sync");

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "tab-shelf.redb";

fn table_for(scope: StorageScope) -> TableDefinition<'static, &'static str, &'static str> {
    match scope {
        StorageScope::Local => LOCAL_TABLE,
        StorageScope::Sync => SYNC_TABLE,
    }
}

/// An opened storage database shared by the areas it hands out.
pub struct RedbBackend {
    db: Database,
}

impl std::fmt::Debug for RedbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbBackend").finish()
    }
}

impl RedbBackend {
    /// Opens or creates `tab-shelf.redb` in `data_dir`.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened.
    pub fn open_in(data_dir: &Path) -> Result<Arc<Self>> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Self::open(&data_dir.join(DB_FILE_NAME))
    }

    /// Opens or creates the storage database at `path`.
    ///
    /// Initializes both scope tables on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: &Path) -> Result<Arc<Self>> {
        let db = Database::create(path)
            .with_context(|| format!("Failed to open storage database: {}", path.display()))?;

        // Ensure tables exist
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial write transaction")?;
        {
            let _ = write_txn
                .open_table(LOCAL_TABLE)
                .context("Failed to create storage_local table")?;
            let _ = write_txn
                .open_table(SYNC_TABLE)
                .context("Failed to create storage_sync table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial transaction")?;

        Ok(Arc::new(Self { db }))
    }

    /// Returns the area serving `scope`.
    pub fn area(self: &Arc<Self>, scope: StorageScope) -> RedbArea {
        RedbArea {
            backend: Arc::clone(self),
            scope,
        }
    }

    fn read(&self, scope: StorageScope, key: &str) -> Result<Option<Value>, StorageError> {
        let err = |e: &dyn std::fmt::Display| StorageError::backend(scope, e);

        let read_txn = self.db.begin_read().map_err(|e| err(&e))?;
        let table = read_txn.open_table(table_for(scope)).map_err(|e| err(&e))?;

        match table.get(key).map_err(|e| err(&e))? {
            Some(guard) => serde_json::from_str(guard.value())
                .map(Some)
                .map_err(|source| StorageError::Decode {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn write(&self, scope: StorageScope, key: &str, value: &Value) -> Result<(), StorageError> {
        let err = |e: &dyn std::fmt::Display| StorageError::backend(scope, e);

        let text = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;

        let write_txn = self.db.begin_write().map_err(|e| err(&e))?;
        {
            let mut table = write_txn.open_table(table_for(scope)).map_err(|e| err(&e))?;
            table.insert(key, text.as_str()).map_err(|e| err(&e))?;
        }
        write_txn.commit().map_err(|e| err(&e))?;
        Ok(())
    }
}

/// One scope of a `RedbBackend`.
///
/// Transactions run on tokio's blocking pool, since a commit waits on fsync.
#[derive(Debug, Clone)]
pub struct RedbArea {
    backend: Arc<RedbBackend>,
    scope: StorageScope,
}

#[async_trait]
impl StorageArea for RedbArea {
    fn scope(&self) -> StorageScope {
        self.scope
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let backend = Arc::clone(&self.backend);
        let (scope, key) = (self.scope, key.to_string());
        tokio::task::spawn_blocking(move || backend.read(scope, &key))
            .await
            .map_err(|e| StorageError::backend(scope, format!("Task join error: {e}")))?
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let backend = Arc::clone(&self.backend);
        let (scope, key) = (self.scope, key.to_string());
        tokio::task::spawn_blocking(move || backend.write(scope, &key, &value))
            .await
            .map_err(|e| StorageError::backend(scope, format!("Task join error: {e}")))?
    }
}

/// Repository for the single persisted `TabStorage` record.
use std::sync::Arc;

use tab_shelf_config::StorageScope;

use crate::error::StorageError;
use crate::model::TabStorage;
use crate::storage::StorageHelper;

/// Key of the persisted record.
pub const TAB_STORAGE_KEY: &str = "tab";

/// Fetches and saves the whole tab record. No merging, no partial updates.
#[derive(Debug, Clone)]
pub struct TabRepository {
    storage: Arc<StorageHelper>,
}

impl TabRepository {
    pub fn new(storage: Arc<StorageHelper>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &StorageHelper {
        &self.storage
    }

    /// Reads the record. `None` means it was never saved.
    pub async fn fetch(&self, scope: Option<StorageScope>) -> Result<Option<TabStorage>, StorageError> {
        self.storage.load(TAB_STORAGE_KEY, scope).await
    }

    /// Overwrites the record with `data`.
    pub async fn save(&self, data: &TabStorage, scope: Option<StorageScope>) -> Result<(), StorageError> {
        self.storage.store(TAB_STORAGE_KEY, data, scope).await
    }
}

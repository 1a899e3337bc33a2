/// Key/value storage access.
///
/// A `StorageArea` is one asynchronous key-value namespace (the browser's
/// `local` or `sync` area, an in-memory map, or a redb table). The
/// `StorageHelper` owns one area per scope and converts typed values to and
/// from their stored JSON form.
pub mod memory;
pub mod redb_store;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use tab_shelf_config::StorageScope;

use crate::error::StorageError;

pub use memory::MemoryArea;
pub use redb_store::{RedbArea, RedbBackend};

/// One asynchronous key-value namespace.
///
/// Implementations report their own failures as `StorageError::Backend`
/// and never retry.
#[async_trait]
pub trait StorageArea: Send + Sync {
    /// The scope this area serves, used when reporting errors.
    fn scope(&self) -> StorageScope;

    /// Reads the value under `key`. `None` if the key was never set.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Replaces the value under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// Typed access to the local and sync storage areas.
#[derive(Clone)]
pub struct StorageHelper {
    local: Arc<dyn StorageArea>,
    sync: Arc<dyn StorageArea>,
    default_scope: StorageScope,
}

impl std::fmt::Debug for StorageHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageHelper")
            .field("default_scope", &self.default_scope)
            .finish()
    }
}

impl StorageHelper {
    pub fn new(local: Arc<dyn StorageArea>, sync: Arc<dyn StorageArea>) -> Self {
        Self {
            local,
            sync,
            default_scope: StorageScope::Local,
        }
    }

    /// Both scopes backed by fresh in-memory areas.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryArea::new(StorageScope::Local)),
            Arc::new(MemoryArea::new(StorageScope::Sync)),
        )
    }

    /// Both scopes backed by tables of one redb database.
    pub fn with_redb(backend: &Arc<RedbBackend>) -> Self {
        Self::new(
            Arc::new(backend.area(StorageScope::Local)),
            Arc::new(backend.area(StorageScope::Sync)),
        )
    }

    /// Sets the scope used when a call passes `None`.
    pub fn with_default_scope(mut self, scope: StorageScope) -> Self {
        self.default_scope = scope;
        self
    }

    pub fn default_scope(&self) -> StorageScope {
        self.default_scope
    }

    pub fn area(&self, scope: StorageScope) -> &dyn StorageArea {
        match scope {
            StorageScope::Local => self.local.as_ref(),
            StorageScope::Sync => self.sync.as_ref(),
        }
    }

    /// Loads and decodes the value under `key`.
    ///
    /// Returns `Ok(None)` when nothing was stored. Backend failures and
    /// values that don't decode as `T` are returned as errors.
    pub async fn load<T: DeserializeOwned>(
        &self,
        key: &str,
        scope: Option<StorageScope>,
    ) -> Result<Option<T>, StorageError> {
        let scope = scope.unwrap_or(self.default_scope);
        tracing::debug!(key, %scope, "Loading");
        match self.area(scope).get(key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StorageError::Decode {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Encodes `data` and stores it under `key`, replacing any prior value.
    pub async fn store<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
        scope: Option<StorageScope>,
    ) -> Result<(), StorageError> {
        let scope = scope.unwrap_or(self.default_scope);
        let value = serde_json::to_value(data).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        tracing::debug!(key, %scope, "Storing");
        self.area(scope).set(key, value).await
    }
}

/// In-process storage area.
use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use tab_shelf_config::StorageScope;

use super::StorageArea;
use crate::error::StorageError;

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Value>,
    /// Failure message reported by the next `get` or `set`.
    pending_failure: Option<String>,
}

/// A storage area held in memory, for tests and headless hosts.
///
/// The lock is never held across an await point.
#[derive(Debug)]
pub struct MemoryArea {
    scope: StorageScope,
    inner: Mutex<Inner>,
}

impl MemoryArea {
    pub fn new(scope: StorageScope) -> Self {
        Self {
            scope,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Makes the next `get` or `set` fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.inner.lock().pending_failure = Some(message.into());
    }

    /// Writes a raw JSON value, bypassing typed encoding.
    pub fn insert_raw(&self, key: &str, value: Value) {
        self.inner.lock().entries.insert(key.to_string(), value);
    }

    /// Reads the raw JSON value under `key`.
    pub fn get_raw(&self, key: &str) -> Option<Value> {
        self.inner.lock().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    fn take_failure(&self, inner: &mut Inner) -> Result<(), StorageError> {
        match inner.pending_failure.take() {
            Some(message) => Err(StorageError::backend(self.scope, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StorageArea for MemoryArea {
    fn scope(&self) -> StorageScope {
        self.scope
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let mut inner = self.inner.lock();
        self.take_failure(&mut inner)?;
        Ok(inner.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        self.take_failure(&mut inner)?;
        inner.entries.insert(key.to_string(), value);
        Ok(())
    }
}

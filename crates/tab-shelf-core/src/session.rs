/// Tab session: state, persistence, and undo/redo history wired together.
///
/// Every committed change is saved and then pushed into the history.
/// Undo and redo persist the snapshot they land on before showing it.
use std::sync::Arc;

use anyhow::Context;
use tab_shelf_config::ShelfConfig;
use tab_shelf_mod_history::{HistoryBuffer, HistoryConfig};

use crate::error::{Result, SessionError};
use crate::model::{Tab, TabGroup, TabGroupColor, TabStorage};
use crate::repository::TabRepository;
use crate::state::TabStorageState;
use crate::storage::{RedbBackend, StorageHelper};
use crate::tabs::{BrowserTab, TabInventory};

/// A user's stash of tabs with undo/redo.
#[derive(Debug)]
pub struct TabSession {
    state: TabStorageState,
    history: HistoryBuffer<TabStorage>,
}

impl TabSession {
    pub fn new(state: TabStorageState, config: HistoryConfig) -> Self {
        Self {
            state,
            history: HistoryBuffer::new(config),
        }
    }

    /// Builds a session over `storage` using the scope and history length
    /// from `config`.
    pub fn with_storage(storage: Arc<StorageHelper>, config: &ShelfConfig) -> Self {
        let state = TabStorageState::new(TabRepository::new(storage)).with_scope(config.default_scope);
        Self::new(state, HistoryConfig::with_max(config.max_history_length))
    }

    /// Opens the on-disk store in the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage database cannot be opened.
    pub fn open(config: &ShelfConfig) -> anyhow::Result<Self> {
        let data_dir = config.resolve_data_dir();
        let backend = RedbBackend::open_in(&data_dir)
            .with_context(|| format!("Failed to open tab shelf in {}", data_dir.display()))?;
        let storage = StorageHelper::with_redb(&backend).with_default_scope(config.default_scope);
        tracing::info!(data_dir = %data_dir.display(), "Opened tab shelf storage");
        Ok(Self::with_storage(Arc::new(storage), config))
    }

    pub fn state(&self) -> &TabStorageState {
        &self.state
    }

    /// Mutable state access. Changes made here are not saved or recorded
    /// until `commit` is called.
    pub fn state_mut(&mut self) -> &mut TabStorageState {
        &mut self.state
    }

    pub fn history(&self) -> &HistoryBuffer<TabStorage> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Loads the persisted record and starts a fresh history from it.
    pub async fn load(&mut self) -> Result<()> {
        self.state.fetch_tab_storage().await?;
        self.history.clear();
        self.history.update_history(self.state.snapshot());
        Ok(())
    }

    /// Saves the current state and records it as a history point.
    ///
    /// If the save fails nothing is recorded and the in-memory state is
    /// kept, so the change can be retried.
    pub async fn commit(&mut self) -> Result<()> {
        self.state.save_tab_storage().await?;
        self.history.update_history(self.state.snapshot());
        tracing::info!(
            history_len = self.history.len(),
            "Committed tab storage"
        );
        Ok(())
    }

    /// Steps back one history point. Returns `false` if there was nothing
    /// to undo or the point equals the current state, in which case
    /// nothing is written.
    pub async fn undo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.undo().cloned() else {
            return Ok(false);
        };
        if snapshot == self.state.snapshot() {
            return Ok(false);
        }
        if let Err(e) = self.state.persist_and_apply(snapshot).await {
            self.history.redo();
            tracing::warn!("Undo not applied: {e}");
            return Err(e.into());
        }
        tracing::info!(index = ?self.history.index(), "Undo");
        Ok(true)
    }

    /// Steps forward one history point. Returns `false` if there was
    /// nothing to redo or the point equals the current state, in which
    /// case nothing is written.
    pub async fn redo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.redo().cloned() else {
            return Ok(false);
        };
        if snapshot == self.state.snapshot() {
            return Ok(false);
        }
        if let Err(e) = self.state.persist_and_apply(snapshot).await {
            self.history.undo();
            tracing::warn!("Redo not applied: {e}");
            return Err(e.into());
        }
        tracing::info!(index = ?self.history.index(), "Redo");
        Ok(true)
    }

    /// Appends the browser's active tab to the loose tabs and commits.
    pub async fn stash_current_tab(&mut self, inventory: &dyn TabInventory) -> Result<Tab> {
        let current = inventory
            .current_tab()
            .await?
            .ok_or(SessionError::NoActiveTab)?;
        let tab = current.to_tab();
        let stashed = tab.clone();
        self.state.update_tabs(|tabs| tabs.push(tab));
        self.commit().await?;
        Ok(stashed)
    }

    /// Appends a new tab group and commits.
    pub async fn stash_group(
        &mut self,
        group_name: impl Into<String>,
        color: TabGroupColor,
        tabs: Vec<Tab>,
    ) -> Result<()> {
        let group = TabGroup {
            tabs,
            group_name: group_name.into(),
            color,
        };
        self.state.update_tab_groups(|groups| groups.push(group));
        self.commit().await
    }

    /// Removes the tab group at `index` and commits.
    pub async fn remove_group(&mut self, index: usize) -> Result<TabGroup> {
        let len = self.state.tab_groups().len();
        if index >= len {
            return Err(SessionError::GroupOutOfRange { index, len });
        }
        let removed = self.state.update_tab_groups(|groups| groups.remove(index));
        self.commit().await?;
        Ok(removed)
    }

    /// Removes the loose tab at `index` and commits.
    pub async fn remove_tab(&mut self, index: usize) -> Result<Tab> {
        let len = self.state.tabs().len();
        if index >= len {
            return Err(SessionError::TabOutOfRange { index, len });
        }
        let removed = self.state.update_tabs(|tabs| tabs.remove(index));
        self.commit().await?;
        Ok(removed)
    }

    /// Focuses an open tab showing `url`, or opens a new one.
    pub async fn open_url(&self, inventory: &dyn TabInventory, url: &str) -> Result<BrowserTab> {
        let existing = inventory.find_by_url(url).await?;
        match existing.into_iter().next() {
            Some(tab) => {
                inventory.to_active(tab.index).await?;
                tracing::debug!(index = tab.index, "Switched to open tab");
                Ok(tab)
            }
            None => inventory.create(url, true).await,
        }
    }

    /// Opens every tab of the group at `index`. The first one gets focus.
    pub async fn restore_group(
        &self,
        inventory: &dyn TabInventory,
        index: usize,
    ) -> Result<Vec<BrowserTab>> {
        let group = self
            .state
            .tab_groups()
            .get(index)
            .ok_or(SessionError::GroupOutOfRange {
                index,
                len: self.state.tab_groups().len(),
            })?;

        let mut opened = Vec::with_capacity(group.tabs.len());
        for (i, tab) in group.tabs.iter().enumerate() {
            opened.push(inventory.create(&tab.url, i == 0).await?);
        }
        tracing::info!(group = %group.group_name, opened = opened.len(), "Restored tab group");
        Ok(opened)
    }
}

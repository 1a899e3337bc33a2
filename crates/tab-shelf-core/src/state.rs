/// Live in-memory copy of the stashed tabs and tab groups.
///
/// Fields are plain owned values. Every mutation goes through a method
/// that notifies subscribed observers, so a UI layer can re-render without
/// the model depending on any binding mechanism.
use tab_shelf_config::StorageScope;

use crate::error::StorageError;
use crate::model::{Tab, TabGroup, TabStorage};
use crate::repository::TabRepository;

/// What part of the state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Tabs,
    TabGroups,
    /// Both sequences were replaced (fetch or snapshot apply).
    Replaced,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(StateChange) + Send + Sync>;

/// UI-visible tab state, synchronized with the repository on demand.
///
/// Assumes a single logical writer: fetch and save take the state by
/// reference and are not guarded against interleaving.
pub struct TabStorageState {
    tabs: Vec<Tab>,
    tab_groups: Vec<TabGroup>,
    repository: TabRepository,
    /// Scope passed to the repository. `None` = the storage default.
    scope: Option<StorageScope>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl std::fmt::Debug for TabStorageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabStorageState")
            .field("tabs_len", &self.tabs.len())
            .field("tab_groups_len", &self.tab_groups.len())
            .field("scope", &self.scope)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TabStorageState {
    /// Creates an empty state bound to `repository`.
    pub fn new(repository: TabRepository) -> Self {
        Self {
            tabs: Vec::new(),
            tab_groups: Vec::new(),
            repository,
            scope: None,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Reads and writes the record in `scope` instead of the default.
    pub fn with_scope(mut self, scope: StorageScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab_groups(&self) -> &[TabGroup] {
        &self.tab_groups
    }

    pub fn repository(&self) -> &TabRepository {
        &self.repository
    }

    pub fn set_tabs(&mut self, tabs: Vec<Tab>) {
        self.tabs = tabs;
        self.notify(StateChange::Tabs);
    }

    pub fn set_tab_groups(&mut self, tab_groups: Vec<TabGroup>) {
        self.tab_groups = tab_groups;
        self.notify(StateChange::TabGroups);
    }

    /// Mutates the tab list in place and notifies observers. Returns
    /// whatever `f` returns.
    pub fn update_tabs<R, F: FnOnce(&mut Vec<Tab>) -> R>(&mut self, f: F) -> R {
        let out = f(&mut self.tabs);
        self.notify(StateChange::Tabs);
        out
    }

    /// Mutates the group list in place and notifies observers.
    pub fn update_tab_groups<R, F: FnOnce(&mut Vec<TabGroup>) -> R>(&mut self, f: F) -> R {
        let out = f(&mut self.tab_groups);
        self.notify(StateChange::TabGroups);
        out
    }

    /// An owned copy of the current state.
    pub fn snapshot(&self) -> TabStorage {
        TabStorage {
            tabs: self.tabs.clone(),
            tab_groups: self.tab_groups.clone(),
        }
    }

    /// Replaces the whole state with `storage`.
    pub fn apply(&mut self, storage: TabStorage) {
        self.tabs = storage.tabs;
        self.tab_groups = storage.tab_groups;
        self.notify(StateChange::Replaced);
    }

    /// Replaces in-memory state with the persisted record.
    ///
    /// A missing record yields empty sequences. Unsaved edits are
    /// overwritten. On error the state is left untouched.
    pub async fn fetch_tab_storage(&mut self) -> Result<(), StorageError> {
        let stored = self.repository.fetch(self.scope).await?;
        tracing::debug!(found = stored.is_some(), "Fetched tab storage");
        self.apply(stored.unwrap_or_default());
        Ok(())
    }

    /// Persists a copy of the current state as the new record.
    pub async fn save_tab_storage(&self) -> Result<(), StorageError> {
        let snapshot = self.snapshot();
        self.repository.save(&snapshot, self.scope).await?;
        tracing::debug!(
            tabs = snapshot.tabs.len(),
            tab_groups = snapshot.tab_groups.len(),
            "Saved tab storage"
        );
        Ok(())
    }

    /// Saves `storage` as the record, then makes it the in-memory state.
    ///
    /// The state is only replaced once the save succeeded.
    pub async fn persist_and_apply(&mut self, storage: TabStorage) -> Result<(), StorageError> {
        self.repository.save(&storage, self.scope).await?;
        self.apply(storage);
        Ok(())
    }

    /// Registers `observer`, called after every change.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(StateChange) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&self, change: StateChange) {
        for (_, observer) in &self.observers {
            observer(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::model::TabGroupColor;
    use crate::storage::{MemoryArea, StorageHelper};

    fn state_with_area() -> (TabStorageState, Arc<MemoryArea>) {
        let local = Arc::new(MemoryArea::new(StorageScope::Local));
        let helper = StorageHelper::new(local.clone(), Arc::new(MemoryArea::new(StorageScope::Sync)));
        let state = TabStorageState::new(TabRepository::new(Arc::new(helper)));
        (state, local)
    }

    fn recorder(state: &mut TabStorageState) -> Arc<Mutex<Vec<StateChange>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        state.subscribe(move |change| sink.lock().push(change));
        seen
    }

    fn group(name: &str) -> TabGroup {
        TabGroup {
            tabs: vec![Tab::new(format!("https://{name}.test"), name)],
            group_name: name.to_string(),
            color: TabGroupColor::Purple,
        }
    }

    #[tokio::test]
    async fn test_fetch_without_record_gives_empty_state() {
        let (mut state, _area) = state_with_area();
        state.set_tabs(vec![Tab::new("https://unsaved.test", "unsaved")]);

        state.fetch_tab_storage().await.unwrap();
        assert!(state.tabs().is_empty());
        assert!(state.tab_groups().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_fetch_round_trip() {
        let (mut state, _area) = state_with_area();
        state.set_tabs(vec![Tab::new("https://a.test", "a")]);
        state.set_tab_groups(vec![group("work"), group("home")]);
        let saved = state.snapshot();

        state.save_tab_storage().await.unwrap();
        state.set_tabs(Vec::new());
        state.fetch_tab_storage().await.unwrap();

        assert_eq!(state.snapshot(), saved);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_unsaved_edits() {
        let (mut state, area) = state_with_area();
        state.set_tabs(vec![Tab::new("https://keep.test", "keep")]);

        area.fail_next("read failed");
        assert!(state.fetch_tab_storage().await.is_err());
        assert_eq!(state.tabs().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_state_and_record() {
        let (mut state, area) = state_with_area();
        state.set_tabs(vec![Tab::new("https://first.test", "first")]);
        state.save_tab_storage().await.unwrap();

        state.set_tabs(vec![Tab::new("https://second.test", "second")]);
        area.fail_next("write failed");
        let err = state.save_tab_storage().await.unwrap_err();
        assert_eq!(err.to_string(), "local storage failed: write failed");

        assert_eq!(state.tabs()[0].url, "https://second.test");
        let raw = area.get_raw("tab").expect("record");
        assert_eq!(raw["tabs"][0]["url"], "https://first.test");
    }

    #[tokio::test]
    async fn test_snapshot_does_not_alias_state() {
        let (mut state, _area) = state_with_area();
        state.set_tab_groups(vec![group("a")]);
        let snapshot = state.snapshot();

        state.update_tab_groups(|groups| groups[0].tabs.clear());
        assert_eq!(snapshot.tab_groups[0].tabs.len(), 1);
    }

    #[tokio::test]
    async fn test_observers_see_every_change() {
        let (mut state, _area) = state_with_area();
        let seen = recorder(&mut state);

        state.set_tabs(Vec::new());
        state.update_tab_groups(|groups| groups.push(group("x")));
        state.fetch_tab_storage().await.unwrap();
        state.apply(TabStorage::default());

        assert_eq!(
            *seen.lock(),
            vec![
                StateChange::Tabs,
                StateChange::TabGroups,
                StateChange::Replaced,
                StateChange::Replaced
            ]
        );
    }

    #[test]
    fn test_update_returns_closure_value() {
        let (mut state, _area) = state_with_area();
        state.set_tabs(vec![Tab::new("https://a.test", "a"), Tab::new("https://b.test", "b")]);
        state.set_tab_groups(vec![group("work")]);
        let seen = recorder(&mut state);

        let tab = state.update_tabs(|tabs| tabs.remove(0));
        let removed = state.update_tab_groups(|groups| groups.pop());

        assert_eq!(tab.url, "https://a.test");
        assert_eq!(removed.map(|g| g.group_name).as_deref(), Some("work"));
        assert_eq!(state.tabs().len(), 1);
        assert!(state.tab_groups().is_empty());
        assert_eq!(*seen.lock(), vec![StateChange::Tabs, StateChange::TabGroups]);
    }

    #[test]
    fn test_unsubscribe() {
        let (mut state, _area) = state_with_area();
        let seen = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&seen);
        let id = state.subscribe(move |_| *sink.lock() += 1);

        state.set_tabs(Vec::new());
        assert!(state.unsubscribe(id));
        assert!(!state.unsubscribe(id));
        state.set_tabs(Vec::new());

        assert_eq!(*seen.lock(), 1);
    }

    #[tokio::test]
    async fn test_scope_override() {
        let helper = Arc::new(StorageHelper::in_memory());
        let mut state =
            TabStorageState::new(TabRepository::new(Arc::clone(&helper))).with_scope(StorageScope::Sync);
        state.set_tabs(vec![Tab::new("https://s.test", "s")]);
        state.save_tab_storage().await.unwrap();

        let repo = TabRepository::new(helper);
        assert!(repo.fetch(Some(StorageScope::Local)).await.unwrap().is_none());
        assert!(repo.fetch(Some(StorageScope::Sync)).await.unwrap().is_some());
    }
}

/// Tab shelf core: save and restore groups of browser tabs.
///
/// Layers, leaf first: `storage` (async key-value areas), `repository`
/// (the single `"tab"` record), `state` (live copy with observers) and
/// `session` (state + persistence + undo/redo history).
pub mod error;
pub mod model;
pub mod repository;
pub mod session;
pub mod state;
pub mod storage;
pub mod tabs;

pub use error::{SessionError, StorageError};
pub use model::{Tab, TabGroup, TabGroupColor, TabStorage};
pub use repository::{TabRepository, TAB_STORAGE_KEY};
pub use session::TabSession;
pub use state::{StateChange, SubscriptionId, TabStorageState};
pub use storage::{MemoryArea, RedbArea, RedbBackend, StorageArea, StorageHelper};
pub use tab_shelf_config::{ShelfConfig, StorageScope};
pub use tab_shelf_mod_history::{HistoryBuffer, HistoryConfig};
pub use tabs::{BrowserTab, MemoryTabInventory, TabInventory};

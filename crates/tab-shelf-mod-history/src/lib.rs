/// Bounded, linear undo/redo history over value snapshots.
///
/// Provides a `HistoryBuffer` that keeps the most recent snapshots in memory
/// behind a cursor. Committing a new snapshot after an undo prunes the
/// abandoned redo branch. The buffer knows nothing about persistence or
/// browser tabs, so any cloneable value can be tracked.
pub mod buffer;
pub mod config;

pub use buffer::HistoryBuffer;
pub use config::HistoryConfig;

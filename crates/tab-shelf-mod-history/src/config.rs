/// Configuration for the history buffer.

/// Number of snapshots retained when no explicit limit is given.
pub const DEFAULT_MAX_HISTORY_LENGTH: usize = 30;

/// Configuration for the history system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Max snapshots kept. Oldest snapshots are evicted past this limit.
    pub max_history_length: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history_length: DEFAULT_MAX_HISTORY_LENGTH,
        }
    }
}

impl HistoryConfig {
    /// Creates a config retaining at most `max_history_length` snapshots.
    pub fn with_max(max_history_length: usize) -> Self {
        Self { max_history_length }
    }

    /// Effective capacity. A buffer always retains at least one snapshot.
    pub fn capacity(&self) -> usize {
        self.max_history_length.max(1)
    }
}

/// Core undo/redo buffer.
///
/// Snapshots are stored oldest first. A cursor points at the snapshot the
/// caller currently sees; `None` means "before the first entry".
use crate::config::HistoryConfig;

/// Bounded linear history of snapshots with an undo/redo cursor.
///
/// Snapshots are owned by the buffer once pushed. Undo and redo hand out
/// borrows; callers clone when they need to keep a snapshot around.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    /// Retained snapshots, ordered oldest first.
    history: Vec<T>,
    /// Position of the current snapshot in `history`.
    index: Option<usize>,
    /// Configuration parameters.
    config: HistoryConfig,
}

impl<T> Default for HistoryBuffer<T> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<T> HistoryBuffer<T> {
    /// Creates an empty buffer.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            history: Vec::with_capacity(config.capacity().min(64)),
            index: None,
            config,
        }
    }

    /// Creates an empty buffer retaining at most `max` snapshots.
    pub fn with_max(max: usize) -> Self {
        Self::new(HistoryConfig::with_max(max))
    }

    /// Records `snapshot` as the newest committed point.
    ///
    /// Everything after the cursor is discarded first, so committing after
    /// an undo abandons the undone future. When the buffer grows past its
    /// capacity the oldest snapshot is evicted and the cursor shifts with
    /// the remaining entries.
    pub fn update_history(&mut self, snapshot: T) {
        let keep = self.index.map_or(0, |i| i + 1);
        if keep < self.history.len() {
            tracing::trace!(
                pruned = self.history.len() - keep,
                "Discarding redo branch"
            );
            self.history.truncate(keep);
        }

        self.history.push(snapshot);

        let capacity = self.config.capacity();
        if self.history.len() > capacity {
            let excess = self.history.len() - capacity;
            self.history.drain(..excess);
            tracing::trace!(evicted = excess, "Evicted oldest history entries");
        }
        self.index = Some(self.history.len() - 1);
    }

    /// Steps the cursor back and returns the snapshot now under it.
    ///
    /// Returns `None` when there is nothing to undo. Stepping back from the
    /// oldest retained snapshot moves the cursor before the first entry and
    /// also returns `None`.
    pub fn undo(&mut self) -> Option<&T> {
        let current = self.index?;
        if current == 0 {
            self.index = None;
            return None;
        }
        let previous = current - 1;
        self.index = Some(previous);
        self.history.get(previous)
    }

    /// Steps the cursor forward and returns the snapshot now under it.
    ///
    /// Returns `None` when the cursor already sits on the newest snapshot.
    pub fn redo(&mut self) -> Option<&T> {
        let next = self.index.map_or(0, |i| i + 1);
        if next >= self.history.len() {
            return None;
        }
        self.index = Some(next);
        self.history.get(next)
    }

    /// Whether a call to `undo` would move the cursor.
    pub fn can_undo(&self) -> bool {
        self.index.is_some()
    }

    /// Whether a call to `redo` would return a snapshot.
    pub fn can_redo(&self) -> bool {
        self.index.map_or(0, |i| i + 1) < self.history.len()
    }

    /// The snapshot under the cursor, if any.
    pub fn current(&self) -> Option<&T> {
        self.index.and_then(|i| self.history.get(i))
    }

    /// Cursor position. `None` means before the first entry.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Retained snapshots, oldest first.
    pub fn entries(&self) -> &[T] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Effective maximum number of retained snapshots.
    pub fn capacity(&self) -> usize {
        self.config.capacity()
    }

    /// Drops every snapshot and resets the cursor.
    pub fn clear(&mut self) {
        self.history.clear();
        self.index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(max: usize, values: &[&'static str]) -> HistoryBuffer<&'static str> {
        let mut buf = HistoryBuffer::with_max(max);
        for v in values {
            buf.update_history(*v);
        }
        buf
    }

    // --- Basic undo/redo ---

    #[test]
    fn test_first_push_on_fresh_buffer() {
        let mut buf = HistoryBuffer::with_max(30);
        buf.update_history("a");
        assert_eq!(buf.entries(), &["a"]);
        assert_eq!(buf.index(), Some(0));
    }

    #[test]
    fn test_empty_history() {
        let mut buf: HistoryBuffer<&str> = HistoryBuffer::default();
        assert!(!buf.can_undo());
        assert!(!buf.can_redo());
        assert!(buf.undo().is_none());
        assert!(buf.redo().is_none());
        assert_eq!(buf.index(), None);
    }

    #[test]
    fn test_redo_after_push_is_noop() {
        let mut buf = filled(5, &["a", "b"]);
        assert!(buf.redo().is_none());
        assert_eq!(buf.index(), Some(1));
    }

    #[test]
    fn test_undo_moves_cursor_before_reading() {
        let mut buf = filled(5, &["a", "b", "c"]);
        assert_eq!(buf.undo(), Some(&"b"));
        assert_eq!(buf.index(), Some(1));
        assert_eq!(buf.current(), Some(&"b"));
    }

    #[test]
    fn test_undo_then_redo_returns_previous_current() {
        let mut buf = filled(5, &["a", "b", "c"]);
        buf.undo();
        let before = *buf.current().expect("current");
        buf.undo();
        assert_eq!(buf.redo(), Some(&before));
    }

    #[test]
    fn test_undo_from_first_entry_reaches_start() {
        let mut buf = filled(5, &["a"]);
        assert!(buf.undo().is_none());
        assert_eq!(buf.index(), None);
        assert!(!buf.can_undo());
        assert!(buf.undo().is_none());
        assert_eq!(buf.index(), None);

        // Redo walks forward from the start again
        assert_eq!(buf.redo(), Some(&"a"));
        assert_eq!(buf.index(), Some(0));
    }

    #[test]
    fn test_push_after_undo_prunes_redo_branch() {
        let mut buf = filled(5, &["a", "b", "c"]);
        buf.undo();
        buf.undo();
        buf.update_history("d");
        assert_eq!(buf.entries(), &["a", "d"]);
        assert_eq!(buf.index(), Some(1));
        assert!(!buf.can_redo());
    }

    // --- Capacity ---

    #[test]
    fn test_push_up_to_capacity_keeps_all() {
        let buf = filled(4, &["a", "b", "c", "d"]);
        assert_eq!(buf.entries(), &["a", "b", "c", "d"]);
        assert_eq!(buf.index(), Some(3));
    }

    #[test]
    fn test_push_past_capacity_keeps_latest() {
        let buf = filled(3, &["a", "b", "c", "d", "e"]);
        assert_eq!(buf.entries(), &["c", "d", "e"]);
        assert_eq!(buf.index(), Some(2));
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        let mut buf = HistoryBuffer::with_max(4);
        for i in 0..50 {
            buf.update_history(i);
            assert!(buf.len() <= 4);
            if i % 3 == 0 {
                buf.undo();
            }
        }
    }

    #[test]
    fn test_undo_redo_never_evict() {
        let mut buf = filled(2, &["a", "b"]);
        buf.undo();
        buf.redo();
        buf.undo();
        assert_eq!(buf.entries(), &["a", "b"]);
    }

    #[test]
    fn test_zero_capacity_still_keeps_latest() {
        let buf = filled(0, &["a", "b"]);
        assert_eq!(buf.entries(), &["b"]);
        assert_eq!(buf.index(), Some(0));
    }

    // --- Capacity-3 walkthrough ---

    #[test]
    fn test_capacity_three_scenario() {
        let mut buf = filled(3, &["A", "B", "C", "D"]);
        assert_eq!(buf.entries(), &["B", "C", "D"]);
        assert_eq!(buf.index(), Some(2));

        assert_eq!(buf.undo(), Some(&"C"));
        assert_eq!(buf.index(), Some(1));
        assert_eq!(buf.undo(), Some(&"B"));
        assert_eq!(buf.index(), Some(0));
        assert!(buf.undo().is_none());
        assert_eq!(buf.index(), None);

        buf.update_history("E");
        assert_eq!(buf.entries(), &["E"]);
        assert_eq!(buf.index(), Some(0));
    }

    #[test]
    fn test_clear() {
        let mut buf = filled(3, &["a", "b"]);
        buf.clear();
        assert!(buf.is_empty());
        assert!(!buf.can_undo());
        assert!(!buf.can_redo());
    }
}

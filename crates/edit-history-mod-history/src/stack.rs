/// Linear snapshot history with a movable cursor.
///
/// Entries are ordered oldest first. The cursor points at the entry that is
/// currently restored; entries after it form the redo tail.
use crate::snapshot::Snapshot;

/// Ordered snapshot history for a single editable region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStack {
    /// Snapshots, oldest first.
    entries: Vec<Snapshot>,
    /// Index of the current entry. `None` only when `entries` is empty.
    cursor: Option<usize>,
    /// Maximum number of entries kept. Oldest are evicted first.
    max_depth: usize,
}

impl HistoryStack {
    /// Creates an empty stack holding at most `max_depth` snapshots.
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            max_depth: max_depth.max(1),
        }
    }

    /// Creates a stack primed with `entries`, positioned on the newest one.
    pub fn from_snapshots(entries: Vec<Snapshot>, max_depth: usize) -> Self {
        let cursor = entries.len().checked_sub(1);
        Self::restore(entries, cursor, max_depth)
    }

    /// Rebuilds a stack from stored entries and cursor.
    ///
    /// An out-of-range cursor is clamped to the newest entry. When there are
    /// more entries than `max_depth`, the oldest are dropped.
    pub fn restore(mut entries: Vec<Snapshot>, cursor: Option<usize>, max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        let mut cursor = match (cursor, entries.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, len) => Some(len - 1),
        };
        if entries.len() > max_depth {
            let excess = entries.len() - max_depth;
            entries.drain(..excess);
            cursor = cursor.map(|i| i.saturating_sub(excess));
        }
        Self {
            entries,
            cursor,
            max_depth,
        }
    }

    /// Appends a snapshot after the current entry, discarding the redo tail.
    ///
    /// With `stay` false the cursor moves onto the new entry. With `stay`
    /// true it remains on the entry it was on, so the new snapshot becomes
    /// the redo target instead of the current one.
    pub fn push(&mut self, snapshot: Snapshot, stay: bool) {
        if let Some(i) = self.cursor {
            self.entries.truncate(i + 1);
        }
        self.entries.push(snapshot);
        let newest = self.entries.len() - 1;
        self.cursor = match self.cursor {
            Some(i) if stay => Some(i),
            _ => Some(newest),
        };

        if self.entries.len() > self.max_depth {
            let excess = self.entries.len() - self.max_depth;
            self.entries.drain(..excess);
            self.cursor = self.cursor.map(|i| i.saturating_sub(excess));
            tracing::trace!(evicted = excess, "history depth limit reached");
        }
    }

    /// Moves the cursor one entry back. Returns `false` at the start.
    pub fn back(&mut self) -> bool {
        match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Moves the cursor one entry forward. Returns `false` at the end.
    pub fn forward(&mut self) -> bool {
        match self.cursor {
            Some(i) if i + 1 < self.entries.len() => {
                self.cursor = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    /// The entry under the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether `back()` would move.
    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(i) if i > 0)
    }

    /// Whether `forward()` would move.
    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(i) if i + 1 < self.entries.len())
    }

    /// All entries, oldest first.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.entries
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}

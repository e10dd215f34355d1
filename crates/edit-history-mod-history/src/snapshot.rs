/// Snapshot of an editable region: serialized content plus selection.
use serde::{Deserialize, Serialize};

/// Content of the element at one point in time, tagged with the caret.
///
/// `end` is only present when a range (not a bare caret) was selected.
/// Two snapshots are equal when content and both offsets match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Serialized element content.
    pub content: String,
    /// Caret or selection start offset.
    pub start: Option<usize>,
    /// Selection end offset, only for non-empty ranges.
    pub end: Option<usize>,
}

impl Snapshot {
    /// A snapshot with no selection information.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            start: None,
            end: None,
        }
    }

    /// A snapshot with a collapsed caret at `start`.
    pub fn with_caret(content: impl Into<String>, start: usize) -> Self {
        Self {
            content: content.into(),
            start: Some(start),
            end: None,
        }
    }

    /// A snapshot with a selected range. Collapses to a caret when
    /// `start == end`.
    pub fn with_range(content: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            content: content.into(),
            start: Some(start),
            end: (start != end).then_some(end),
        }
    }

    /// Whether this snapshot carries a non-empty selected range.
    pub fn has_range(&self) -> bool {
        self.end.is_some()
    }
}

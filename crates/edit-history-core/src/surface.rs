/// Editable surface and selection access.
///
/// The controller never touches a concrete widget. It reads and writes
/// content through [`Editable`] and caret offsets through a
/// [`SelectionAccessor`] that is handed the element explicitly.
use ropey::Rope;

/// An element whose serialized content can be read and replaced.
pub trait Editable {
    /// The element's current serialized content.
    fn contents(&self) -> String;

    /// Replaces the element's content.
    fn set_contents(&mut self, content: &str);
}

/// A selection expressed as character offsets into the element's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    /// Builds a range, ordering the offsets so `start <= end`.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A collapsed range (bare caret) at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Reads and writes the live selection of an element.
pub trait SelectionAccessor<E> {
    /// The selection inside `element`, or `None` when it has no selection.
    fn range(&self, element: &E) -> Option<SelectionRange>;

    /// Selects `[start, end]`, or collapses the caret at `start` when `end`
    /// is `None`.
    fn select(&mut self, element: &mut E, start: usize, end: Option<usize>);

    /// Whether the selection is a bare caret (or absent).
    fn is_collapsed(&self, element: &E) -> bool {
        self.range(element).map_or(true, |r| r.is_collapsed())
    }
}

/// In-memory editable text with a char-offset selection.
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    rope: Rope,
    selection: Option<SelectionRange>,
}

impl MemoryElement {
    /// Creates an element holding `text`, with no selection.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: None,
        }
    }

    /// Creates an element holding `text` with the caret at its end.
    pub fn with_caret_at_end(text: &str) -> Self {
        let mut el = Self::new(text);
        el.collapse(el.len_chars());
        el
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn selection(&self) -> Option<SelectionRange> {
        self.selection
    }

    /// Selects `[a, b]`, clamped to the content.
    pub fn set_selection(&mut self, a: usize, b: usize) {
        let len = self.len_chars();
        self.selection = Some(SelectionRange::new(a.min(len), b.min(len)));
    }

    /// Collapses the caret at `offset`, clamped to the content.
    pub fn collapse(&mut self, offset: usize) {
        let offset = offset.min(self.len_chars());
        self.selection = Some(SelectionRange::caret(offset));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// The active range, or a caret at the end when nothing is selected.
    fn active_range(&self) -> SelectionRange {
        self.selection
            .unwrap_or_else(|| SelectionRange::caret(self.len_chars()))
    }

    /// Replaces the selection with `text` and leaves the caret after it.
    pub fn insert(&mut self, text: &str) {
        let range = self.active_range();
        self.rope.remove(range.start..range.end);
        self.rope.insert(range.start, text);
        self.collapse(range.start + text.chars().count());
    }

    /// Deletes the selection, or the char before the caret.
    pub fn backspace(&mut self) {
        let range = self.active_range();
        if !range.is_collapsed() {
            self.rope.remove(range.start..range.end);
            self.collapse(range.start);
        } else if range.start > 0 {
            self.rope.remove(range.start - 1..range.start);
            self.collapse(range.start - 1);
        }
    }

    /// Deletes the selection, or the char after the caret.
    pub fn delete_forward(&mut self) {
        let range = self.active_range();
        if !range.is_collapsed() {
            self.rope.remove(range.start..range.end);
            self.collapse(range.start);
        } else if range.start < self.len_chars() {
            self.rope.remove(range.start..range.start + 1);
            self.collapse(range.start);
        }
    }

    /// Removes and returns the selected text. Empty when nothing is selected.
    pub fn cut(&mut self) -> String {
        let range = self.active_range();
        if range.is_collapsed() {
            return String::new();
        }
        let removed = self.rope.slice(range.start..range.end).to_string();
        self.rope.remove(range.start..range.end);
        self.collapse(range.start);
        removed
    }
}

impl Editable for MemoryElement {
    fn contents(&self) -> String {
        self.rope.to_string()
    }

    fn set_contents(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
        let len = self.len_chars();
        if let Some(sel) = self.selection {
            self.selection = Some(SelectionRange::new(sel.start.min(len), sel.end.min(len)));
        }
    }
}

/// Selection accessor for [`MemoryElement`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySelection;

impl SelectionAccessor<MemoryElement> for MemorySelection {
    fn range(&self, element: &MemoryElement) -> Option<SelectionRange> {
        element.selection()
    }

    fn select(&mut self, element: &mut MemoryElement, start: usize, end: Option<usize>) {
        match end {
            Some(end) => element.set_selection(start, end),
            None => element.collapse(start),
        }
    }
}
